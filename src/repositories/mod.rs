//! Repositorios
//!
//! Cada tabla tiene un trait de acceso a datos con una implementación
//! PostgreSQL (`Pg*Repository`) y otra en memoria (`InMemoryStore`).

pub mod infraction_repository;
pub mod memory;
pub mod usage_repository;
pub mod user_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    infraction::Infraction,
    usage::{Transition, UsageRecord},
    user::{User, UserRole},
    vehicle::Vehicle,
};
use crate::utils::errors::AppResult;

pub use infraction_repository::PgInfractionRepository;
pub use memory::InMemoryStore;
pub use usage_repository::PgUsageRepository;
pub use user_repository::PgUserRepository;
pub use vehicle_repository::PgVehicleRepository;

/// Restricción: un único registro abierto por vehículo
pub const OPEN_USAGE_PER_VEHICLE: &str = "vehicle_usage_one_open_per_vehicle";
/// Restricción: un único registro abierto por conductor
pub const OPEN_USAGE_PER_USER: &str = "vehicle_usage_one_open_per_user";
/// Restricción: email único
pub const UNIQUE_USER_EMAIL: &str = "users_email_key";
/// Restricción: placa única
pub const UNIQUE_LICENSE_PLATE: &str = "vehicles_license_plate_key";

/// Orden de los listados de vehículos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleOrder {
    ByName,
    NewestFirst,
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn list(&self, order: VehicleOrder) -> AppResult<Vec<Vehicle>>;
    async fn license_plate_exists(&self, license_plate: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    /// Actualiza los campos editables (no el estado)
    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    async fn list(&self) -> AppResult<Vec<User>>;
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>>;
    async fn set_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Inserta la reserva y marca el vehículo como reservado en una sola operación.
    /// Falla con `AppError::Conflict(<restricción>)` si el vehículo o el conductor
    /// ya tienen un registro abierto.
    async fn create_reservation(&self, usage: &UsageRecord) -> AppResult<UsageRecord>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UsageRecord>>;
    async fn find_open_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<UsageRecord>>;
    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<UsageRecord>>;
    async fn list_open(&self) -> AppResult<Vec<UsageRecord>>;
    async fn list_all(&self) -> AppResult<Vec<UsageRecord>>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<UsageRecord>>;
    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<UsageRecord>>;
    /// Transición condicional del registro y del estado espejo del vehículo.
    /// Devuelve `None` si el registro ya no está en `transition.from`.
    async fn apply_transition(&self, transition: &Transition) -> AppResult<Option<UsageRecord>>;
}

#[async_trait]
pub trait InfractionRepository: Send + Sync {
    async fn create(&self, infraction: &Infraction) -> AppResult<Infraction>;
    async fn update(&self, infraction: &Infraction) -> AppResult<Infraction>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Infraction>>;
    async fn list(&self) -> AppResult<Vec<Infraction>>;
    async fn list_by_driver(&self, user_id: Uuid) -> AppResult<Vec<Infraction>>;
    async fn count(&self) -> AppResult<i64>;
}
