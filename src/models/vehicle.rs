//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado.
//! Mapea exactamente a la tabla `vehicles` con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{UnknownVariant, UsageStatus};

/// Estado del vehículo, espejo del registro de uso abierto
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Reserved,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Reserved => "reserved",
        }
    }

    /// Estado que debe tener el vehículo cuando su registro de uso está en `usage`
    pub fn mirroring(usage: UsageStatus) -> Self {
        match usage {
            UsageStatus::Reserved => VehicleStatus::Reserved,
            UsageStatus::InUse => VehicleStatus::InUse,
            UsageStatus::Finalized => VehicleStatus::Available,
        }
    }
}

impl TryFrom<String> for VehicleStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "available" => Ok(VehicleStatus::Available),
            "in_use" => Ok(VehicleStatus::InUse),
            "reserved" => Ok(VehicleStatus::Reserved),
            _ => Err(UnknownVariant {
                kind: "vehicle_status",
                value,
            }),
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub registration_number: String,
    pub name: String,
    pub company: String,
    #[sqlx(try_from = "String")]
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar un vehículo nuevo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub license_plate: String,
    pub registration_number: String,
    pub name: String,
    pub company: String,
}

impl Vehicle {
    pub fn new(data: NewVehicle) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            license_plate: data.license_plate,
            registration_number: data.registration_number,
            name: data.name,
            company: data.company,
            status: VehicleStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}

/// Cambios editables de un vehículo (el estado pertenece al ciclo de reservas)
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub license_plate: Option<String>,
    pub registration_number: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
}

impl VehicleChanges {
    pub fn apply(self, vehicle: &mut Vehicle) {
        if let Some(license_plate) = self.license_plate {
            vehicle.license_plate = license_plate;
        }
        if let Some(registration_number) = self.registration_number {
            vehicle.registration_number = registration_number;
        }
        if let Some(name) = self.name {
            vehicle.name = name;
        }
        if let Some(company) = self.company {
            vehicle.company = company;
        }
        vehicle.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_status_round_trips_through_column_value() {
        for status in [VehicleStatus::Available, VehicleStatus::InUse, VehicleStatus::Reserved] {
            assert_eq!(VehicleStatus::try_from(status.as_str().to_string()).unwrap(), status);
        }
        assert!(VehicleStatus::try_from("Disponível".to_string()).is_err());
    }

    #[test]
    fn test_mirroring_usage_status() {
        assert_eq!(VehicleStatus::mirroring(UsageStatus::Reserved), VehicleStatus::Reserved);
        assert_eq!(VehicleStatus::mirroring(UsageStatus::InUse), VehicleStatus::InUse);
        assert_eq!(VehicleStatus::mirroring(UsageStatus::Finalized), VehicleStatus::Available);
    }

    #[test]
    fn test_new_vehicle_starts_available() {
        let vehicle = Vehicle::new(NewVehicle {
            license_plate: "ABC1234".to_string(),
            registration_number: "12345678901".to_string(),
            name: "Fiat Uno".to_string(),
            company: "Frota Sul".to_string(),
        });
        assert!(vehicle.is_available());

        let mut vehicle = vehicle;
        VehicleChanges {
            name: Some("Fiat Uno Way".to_string()),
            ..Default::default()
        }
        .apply(&mut vehicle);
        assert_eq!(vehicle.name, "Fiat Uno Way");
        assert_eq!(vehicle.license_plate, "ABC1234");
    }
}
