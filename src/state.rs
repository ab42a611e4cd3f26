//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: repositorios, reloj y servicios.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    InMemoryStore, InfractionRepository, PgInfractionRepository, PgUsageRepository, PgUserRepository,
    PgVehicleRepository, UsageRepository, UserRepository, VehicleRepository,
};
use crate::services::{AuthService, InfractionService, ReservationService};
use crate::utils::clock::{Clock, LocalClock};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub usages: Arc<dyn UsageRepository>,
    pub clock: Arc<dyn Clock>,
    pub reservations: Arc<ReservationService>,
    pub auth: Arc<AuthService>,
    pub infractions: Arc<InfractionService>,
}

impl AppState {
    /// Estado sobre PostgreSQL
    pub fn from_pool(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgUsageRepository::new(pool.clone())),
            Arc::new(PgInfractionRepository::new(pool)),
            Arc::new(LocalClock),
        )
    }

    /// Estado sobre el store en memoria
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::in_memory_with_clock(config, Arc::new(LocalClock))
    }

    pub fn in_memory_with_clock(config: EnvironmentConfig, clock: Arc<dyn Clock>) -> Self {
        let store = InMemoryStore::new();
        Self::assemble(
            config,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            clock,
        )
    }

    fn assemble(
        config: EnvironmentConfig,
        vehicles: Arc<dyn VehicleRepository>,
        users: Arc<dyn UserRepository>,
        usages: Arc<dyn UsageRepository>,
        infractions: Arc<dyn InfractionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let jwt = JwtConfig::from(&config);
        let reservations = ReservationService::new(vehicles.clone(), usages.clone(), clock.clone());
        let auth = AuthService::new(users.clone(), jwt, config.bcrypt_cost);
        let infractions = InfractionService::new(infractions, usages.clone(), vehicles.clone());

        Self {
            config,
            vehicles,
            users,
            usages,
            clock,
            reservations: Arc::new(reservations),
            auth: Arc::new(auth),
            infractions: Arc::new(infractions),
        }
    }
}
