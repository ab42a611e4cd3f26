//! Ciclo de vida de las reservas de vehículos
//!
//! Disponible → Reservado → En uso → Finalizado (vehículo disponible otra vez).
//! Un vehículo tiene como mucho un registro abierto y un conductor también.
//!
//! El servicio no notifica cambios: después de cada operación el cliente
//! debe volver a pedir el listado (`list_vehicles_with_occupant`).

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use axum::http::StatusCode;

use crate::models::{
    usage::{NewReservation, Stamp, Transition, UsageRecord, UsageStatus},
    user::UserRole,
    vehicle::Vehicle,
};
use crate::repositories::{
    UsageRepository, VehicleOrder, VehicleRepository, OPEN_USAGE_PER_USER, OPEN_USAGE_PER_VEHICLE,
};
use crate::utils::clock::Clock;
use crate::utils::errors::{AppError, AppResult};

/// Conductor autenticado que invoca la operación
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub display_name: String,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Motivo por el que se rechaza una operación del ciclo de vida
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Ya tienes un vehículo reservado o en uso. Devuélvelo antes de reservar otro.")]
    DriverAlreadyHoldsVehicle,

    #[error("El vehículo no está disponible para reserva")]
    VehicleNotAvailable,

    #[error("No tienes una reserva para este vehículo")]
    NoReservation,

    #[error("No estás usando este vehículo")]
    NotInUse,

    #[error("Vehículo no encontrado")]
    VehicleNotFound,

    #[error("Registro de uso no encontrado")]
    RecordNotFound,

    #[error("El registro está en estado '{from}' y no puede pasar a '{to}'")]
    InvalidTransition { from: UsageStatus, to: UsageStatus },

    #[error("Se requieren permisos de administrador")]
    Forbidden,
}

impl Rejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::VehicleNotFound | Rejection::RecordNotFound => StatusCode::NOT_FOUND,
            Rejection::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::CONFLICT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Rejection::VehicleNotFound | Rejection::RecordNotFound => "NOT_FOUND",
            Rejection::Forbidden => "FORBIDDEN",
            _ => "CONSTRAINT_VIOLATION",
        }
    }
}

/// Ocupante actual de un vehículo
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Occupant {
    pub user_id: Uuid,
    pub display_name: String,
    pub usage_id: Uuid,
    pub usage_status: UsageStatus,
}

/// Vehículo con su registro abierto, si lo hay
#[derive(Debug, Clone, Serialize)]
pub struct VehicleWithOccupant {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub occupant: Option<Occupant>,
}

pub struct ReservationService {
    vehicles: Arc<dyn VehicleRepository>,
    usage: Arc<dyn UsageRepository>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        usage: Arc<dyn UsageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { vehicles, usage, clock }
    }

    fn now(&self) -> Stamp {
        Stamp {
            date: self.clock.today(),
            time: self.clock.now_time(),
        }
    }

    /// Reserva un vehículo disponible para el conductor de la sesión
    pub async fn reserve(&self, session: &Session, vehicle_id: Uuid) -> AppResult<UsageRecord> {
        if self.usage.find_open_for_user(session.user_id).await?.is_some() {
            return Err(Rejection::DriverAlreadyHoldsVehicle.into());
        }

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or(Rejection::VehicleNotFound)?;

        if !vehicle.is_available() {
            return Err(Rejection::VehicleNotAvailable.into());
        }

        let record = UsageRecord::reserve(NewReservation {
            vehicle_id,
            user_id: session.user_id,
            driver_name: session.display_name.clone(),
            vehicle_name: vehicle.name.clone(),
            reserved_on: self.clock.today(),
        });

        // El store resuelve las carreras entre dos reservas simultáneas
        let created = self.usage.create_reservation(&record).await.map_err(|e| match e {
            AppError::Conflict(constraint) if constraint == OPEN_USAGE_PER_USER => {
                Rejection::DriverAlreadyHoldsVehicle.into()
            }
            AppError::Conflict(constraint) if constraint == OPEN_USAGE_PER_VEHICLE => {
                Rejection::VehicleNotAvailable.into()
            }
            AppError::NotFound(_) => Rejection::VehicleNotFound.into(),
            other => other,
        })?;

        tracing::info!(
            "🔒 Vehículo '{}' reservado por {} ({})",
            vehicle.name,
            session.display_name,
            created.id
        );
        Ok(created)
    }

    /// Registra la retirada del vehículo reservado por el conductor de la sesión
    pub async fn pick_up(&self, session: &Session, vehicle_id: Uuid) -> AppResult<UsageRecord> {
        let record = self
            .open_record_of(session, vehicle_id, UsageStatus::Reserved)
            .await?
            .ok_or(Rejection::NoReservation)?;

        let updated = self
            .transition(record.id, UsageStatus::Reserved, UsageStatus::InUse, self.now())
            .await?
            .ok_or(Rejection::NoReservation)?;

        tracing::info!("🚗 Retirada registrada: '{}' por {}", updated.vehicle_name, updated.driver_name);
        Ok(updated)
    }

    /// Registra la devolución del vehículo en uso por el conductor de la sesión
    pub async fn return_vehicle(&self, session: &Session, vehicle_id: Uuid) -> AppResult<UsageRecord> {
        let record = self
            .open_record_of(session, vehicle_id, UsageStatus::InUse)
            .await?
            .ok_or(Rejection::NotInUse)?;

        let updated = self
            .transition(record.id, UsageStatus::InUse, UsageStatus::Finalized, self.now())
            .await?
            .ok_or(Rejection::NotInUse)?;

        tracing::info!("✅ Devolución registrada: '{}' por {}", updated.vehicle_name, updated.driver_name);
        Ok(updated)
    }

    /// Retirada administrativa de cualquier reserva abierta
    pub async fn admin_pick_up(&self, session: &Session, usage_id: Uuid, stamp: Option<Stamp>) -> AppResult<UsageRecord> {
        self.admin_transition(session, usage_id, UsageStatus::Reserved, UsageStatus::InUse, stamp)
            .await
    }

    /// Devolución administrativa de cualquier vehículo en uso
    pub async fn admin_return(&self, session: &Session, usage_id: Uuid, stamp: Option<Stamp>) -> AppResult<UsageRecord> {
        self.admin_transition(session, usage_id, UsageStatus::InUse, UsageStatus::Finalized, stamp)
            .await
    }

    /// Todos los vehículos con su ocupante actual, ordenados por nombre
    pub async fn list_vehicles_with_occupant(&self) -> AppResult<Vec<VehicleWithOccupant>> {
        let vehicles = self.vehicles.list(VehicleOrder::ByName).await?;
        let mut open: HashMap<Uuid, UsageRecord> = self
            .usage
            .list_open()
            .await?
            .into_iter()
            .map(|usage| (usage.vehicle_id, usage))
            .collect();

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let occupant = open.remove(&vehicle.id).map(|usage| Occupant {
                    user_id: usage.user_id,
                    display_name: usage.driver_name,
                    usage_id: usage.id,
                    usage_status: usage.status,
                });
                VehicleWithOccupant { vehicle, occupant }
            })
            .collect())
    }

    /// Registros abiertos para la consola de reservas
    pub async fn list_open_records(&self, session: &Session) -> AppResult<Vec<UsageRecord>> {
        if !session.is_admin() {
            return Err(Rejection::Forbidden.into());
        }
        self.usage.list_open().await
    }

    async fn open_record_of(
        &self,
        session: &Session,
        vehicle_id: Uuid,
        expected: UsageStatus,
    ) -> AppResult<Option<UsageRecord>> {
        Ok(self
            .usage
            .find_open_for_vehicle(vehicle_id)
            .await?
            .filter(|usage| usage.user_id == session.user_id && usage.status == expected))
    }

    async fn admin_transition(
        &self,
        session: &Session,
        usage_id: Uuid,
        from: UsageStatus,
        to: UsageStatus,
        stamp: Option<Stamp>,
    ) -> AppResult<UsageRecord> {
        if !session.is_admin() {
            return Err(Rejection::Forbidden.into());
        }

        let record = self
            .usage
            .find_by_id(usage_id)
            .await?
            .ok_or(Rejection::RecordNotFound)?;

        if record.status != from {
            return Err(Rejection::InvalidTransition { from: record.status, to }.into());
        }

        let stamp = stamp.unwrap_or_else(|| self.now());
        if to == UsageStatus::Finalized && returned_before_pick_up(&record, &stamp) {
            return Err(AppError::BadRequest(
                "La devolución no puede ser anterior a la retirada".to_string(),
            ));
        }

        match self.transition(usage_id, from, to, stamp).await? {
            Some(updated) => {
                tracing::info!(
                    "🛠️ {} registró {} -> {} para '{}' ({})",
                    session.display_name,
                    from,
                    to,
                    updated.vehicle_name,
                    updated.driver_name
                );
                Ok(updated)
            }
            None => {
                let current = self
                    .usage
                    .find_by_id(usage_id)
                    .await?
                    .ok_or(Rejection::RecordNotFound)?;
                Err(Rejection::InvalidTransition { from: current.status, to }.into())
            }
        }
    }

    async fn transition(
        &self,
        usage_id: Uuid,
        from: UsageStatus,
        to: UsageStatus,
        stamp: Stamp,
    ) -> AppResult<Option<UsageRecord>> {
        self.usage
            .apply_transition(&Transition {
                usage_id,
                from,
                to,
                stamp,
            })
            .await
    }
}

/// Una devolución fechada antes de la retirada dejaría el registro fuera de
/// la identificación de conductores en multas
fn returned_before_pick_up(record: &UsageRecord, stamp: &Stamp) -> bool {
    match (record.picked_up_on, record.picked_up_at) {
        (Some(date), Some(time)) => (stamp.date, stamp.time) < (date, time),
        (Some(date), None) => stamp.date < date,
        _ => false,
    }
}
