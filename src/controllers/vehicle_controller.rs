use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::repositories::{UsageRepository, VehicleOrder, VehicleRepository, UNIQUE_LICENSE_PLATE};
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct VehicleController {
    vehicles: Arc<dyn VehicleRepository>,
    usages: Arc<dyn UsageRepository>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: state.vehicles.clone(),
            usages: state.usages.clone(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        let data = NewVehicle::from(request);

        // Verificar que la placa no exista
        if self.vehicles.license_plate_exists(&data.license_plate, None).await? {
            return Err(conflict_error("Vehicle", "license_plate", &data.license_plate));
        }

        let vehicle = Vehicle::new(data);
        let created = self
            .vehicles
            .create(&vehicle)
            .await
            .map_err(|e| plate_conflict(e, &vehicle.license_plate))?;

        log::info!("🚗 Vehículo creado: {} ({})", created.name, created.license_plate);
        Ok(ApiResponse::success_with_message(created, "Vehículo creado exitosamente"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list(VehicleOrder::NewestFirst).await
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        let mut vehicle = self.get_by_id(id).await?;
        let changes = VehicleChanges::from(request);

        if let Some(plate) = &changes.license_plate {
            if self.vehicles.license_plate_exists(plate, Some(id)).await? {
                return Err(conflict_error("Vehicle", "license_plate", plate));
            }
        }

        changes.apply(&mut vehicle);
        let updated = self
            .vehicles
            .update(&vehicle)
            .await
            .map_err(|e| plate_conflict(e, &vehicle.license_plate))?;

        Ok(ApiResponse::success_with_message(updated, "Vehículo actualizado exitosamente"))
    }

    /// Sólo se borran vehículos sin registro abierto
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let vehicle = self.get_by_id(id).await?;

        if self.usages.find_open_for_vehicle(id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "El vehículo '{}' está reservado o en uso y no puede eliminarse",
                vehicle.name
            )));
        }

        if !self.vehicles.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        log::info!("🗑️ Vehículo eliminado: {} ({})", vehicle.name, vehicle.license_plate);
        Ok(())
    }
}

fn plate_conflict(error: AppError, plate: &str) -> AppError {
    match error {
        AppError::Conflict(constraint) if constraint == UNIQUE_LICENSE_PLATE => {
            conflict_error("Vehicle", "license_plate", plate)
        }
        other => other,
    }
}
