//! Modelos de datos
//!
//! Structs que mapean las tablas `vehicles`, `users`, `vehicle_usage`
//! e `infractions`.

pub mod infraction;
pub mod usage;
pub mod user;
pub mod vehicle;

pub use infraction::Infraction;
pub use usage::{UsageRecord, UsageStatus};
pub use user::{User, UserRole};
pub use vehicle::{Vehicle, VehicleStatus};

/// Valor de estado desconocido leído del store
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
