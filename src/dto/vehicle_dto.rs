use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{NewVehicle, VehicleChanges};
use crate::utils::validation::{
    normalize_license_plate, validate_license_plate, validate_not_empty, validate_registration_number,
};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    #[validate(custom = "validate_registration_number")]
    pub registration_number: String,
    #[validate(custom = "validate_not_empty")]
    pub name: String,
    #[validate(custom = "validate_not_empty")]
    pub company: String,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        NewVehicle {
            license_plate: normalize_license_plate(&request.license_plate),
            registration_number: request.registration_number.trim().to_string(),
            name: request.name.trim().to_string(),
            company: request.company.trim().to_string(),
        }
    }
}

// Request para actualizar un vehículo (el estado no se edita aquí)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(custom = "validate_registration_number")]
    pub registration_number: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub name: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub company: Option<String>,
}

impl From<UpdateVehicleRequest> for VehicleChanges {
    fn from(request: UpdateVehicleRequest) -> Self {
        VehicleChanges {
            license_plate: request.license_plate.as_deref().map(normalize_license_plate),
            registration_number: request.registration_number.map(|r| r.trim().to_string()),
            name: request.name.map(|n| n.trim().to_string()),
            company: request.company.map(|c| c.trim().to_string()),
        }
    }
}
