use serde::{Deserialize, Serialize};

use crate::models::vehicle::{Vehicle, VehicleStatus};

// Resumen para el panel de administración
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub in_use_vehicles: usize,
    pub reserved_vehicles: usize,
    pub total_infractions: i64,
}

impl DashboardStats {
    pub fn from_fleet(vehicles: &[Vehicle], total_infractions: i64) -> Self {
        let count = |status: VehicleStatus| vehicles.iter().filter(|v| v.status == status).count();
        Self {
            total_vehicles: vehicles.len(),
            available_vehicles: count(VehicleStatus::Available),
            in_use_vehicles: count(VehicleStatus::InUse),
            reserved_vehicles: count(VehicleStatus::Reserved),
            total_infractions,
        }
    }
}
