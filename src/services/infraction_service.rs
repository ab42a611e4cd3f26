//! Multas de trânsito
//!
//! Al guardar una multa se busca qué conductor tenía el vehículo en la
//! fecha de la infracción.

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::infraction_dto::InfractionRequest;
use crate::models::{infraction::Infraction, usage::UsageRecord};
use crate::repositories::{InfractionRepository, UsageRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, AppResult};

/// Registro de uso que cubría `date`. Sólo cuentan los usos con retirada;
/// si varios coinciden gana la retirada más reciente.
pub fn identify_driver(usages: &[UsageRecord], date: NaiveDate) -> Option<&UsageRecord> {
    usages
        .iter()
        .filter(|usage| usage.covers(date))
        .max_by_key(|usage| (usage.picked_up_on, usage.picked_up_at))
}

pub struct InfractionService {
    infractions: Arc<dyn InfractionRepository>,
    usages: Arc<dyn UsageRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl InfractionService {
    pub fn new(
        infractions: Arc<dyn InfractionRepository>,
        usages: Arc<dyn UsageRepository>,
        vehicles: Arc<dyn VehicleRepository>,
    ) -> Self {
        Self {
            infractions,
            usages,
            vehicles,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Infraction>> {
        self.infractions.list().await
    }

    pub async fn list_for_driver(&self, user_id: Uuid) -> AppResult<Vec<Infraction>> {
        self.infractions.list_by_driver(user_id).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.infractions.count().await
    }

    pub async fn create(&self, request: InfractionRequest) -> AppResult<Infraction> {
        request.validate()?;
        let (vehicle_name, driver) = self.resolve(&request).await?;

        let infraction = Infraction::new(request.into_data(vehicle_name, driver));
        let created = self.infractions.create(&infraction).await?;

        tracing::info!(
            "🧾 Multa {} registrada para '{}' (conductor identificado: {})",
            created.ticket_number,
            created.vehicle_name,
            created.driver_identified
        );
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, request: InfractionRequest) -> AppResult<Infraction> {
        request.validate()?;
        let mut infraction = self
            .infractions
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Infraction", &id.to_string()))?;

        let (vehicle_name, driver) = self.resolve(&request).await?;
        infraction.overwrite(request.into_data(vehicle_name, driver));
        self.infractions.update(&infraction).await
    }

    async fn resolve(&self, request: &InfractionRequest) -> AppResult<(String, Option<Uuid>)> {
        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))?;

        let usages = self.usages.list_by_vehicle(vehicle.id).await?;
        let driver = identify_driver(&usages, request.infraction_date).map(|usage| usage.user_id);
        Ok((vehicle.name, driver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usage::{NewReservation, Stamp, Transition, UsageStatus};
    use crate::models::vehicle::{NewVehicle, Vehicle};
    use crate::repositories::InMemoryStore;
    use crate::utils::errors::AppError;
    use chrono::NaiveTime;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn usage(user_id: Uuid, picked: Option<u32>, returned: Option<u32>) -> UsageRecord {
        let mut usage = UsageRecord::reserve(NewReservation {
            vehicle_id: Uuid::new_v4(),
            user_id,
            driver_name: "Ana".to_string(),
            vehicle_name: "Fiat Uno".to_string(),
            reserved_on: date(1),
        });
        usage.picked_up_on = picked.map(date);
        usage.picked_up_at = picked.map(|_| NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        usage.returned_on = returned.map(date);
        usage
    }

    fn request(vehicle_id: Uuid, day: u32) -> InfractionRequest {
        InfractionRequest {
            vehicle_id,
            ticket_number: "AB12345".to_string(),
            renainf: None,
            infraction_date: date(day),
            infraction_time: None,
            location: Some("Av. Brasil, 1000".to_string()),
            description: None,
            infraction_type: None,
            offender: None,
            status: None,
            original_fine: None,
            original_amount: None,
            net_amount: None,
            appeal_deadline: None,
            identification_deadline: None,
            due_date: None,
            slip_printed: false,
        }
    }

    #[test]
    fn test_identify_driver_by_window() {
        let (ana, bia) = (Uuid::new_v4(), Uuid::new_v4());
        let usages = vec![usage(ana, Some(2), Some(4)), usage(bia, Some(5), None)];

        assert_eq!(identify_driver(&usages, date(3)).map(|u| u.user_id), Some(ana));
        assert_eq!(identify_driver(&usages, date(20)).map(|u| u.user_id), Some(bia));
        assert!(identify_driver(&usages, date(1)).is_none());
    }

    #[test]
    fn test_identify_driver_ignores_reservations_never_picked_up() {
        let usages = vec![usage(Uuid::new_v4(), None, None)];
        assert!(identify_driver(&usages, date(1)).is_none());
    }

    #[test]
    fn test_identify_driver_latest_pickup_wins() {
        let (ana, bia) = (Uuid::new_v4(), Uuid::new_v4());
        // Devolución y nueva retirada el mismo día
        let usages = vec![usage(ana, Some(2), Some(6)), usage(bia, Some(6), Some(8))];
        assert_eq!(identify_driver(&usages, date(6)).map(|u| u.user_id), Some(bia));
    }

    #[tokio::test]
    async fn test_create_and_update_resolve_driver() {
        let store = InMemoryStore::new();
        let car = Vehicle::new(NewVehicle {
            license_plate: "ABC1234".to_string(),
            registration_number: "12345678901".to_string(),
            name: "Fiat Uno".to_string(),
            company: "Frota Sul".to_string(),
        });
        VehicleRepository::create(&store, &car).await.unwrap();

        let service = InfractionService::new(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store.clone()));

        let orphan = service.create(request(car.id, 3)).await.unwrap();
        assert_eq!(orphan.vehicle_name, "Fiat Uno");
        assert_eq!(orphan.status, "Pendente");
        assert!(!orphan.driver_identified);
        assert!(orphan.offending_driver_id.is_none());

        let ana = Uuid::new_v4();
        let reservation = UsageRecord {
            vehicle_id: car.id,
            ..usage(ana, None, None)
        };
        store.create_reservation(&reservation).await.unwrap();
        store
            .apply_transition(&Transition {
                usage_id: reservation.id,
                from: UsageStatus::Reserved,
                to: UsageStatus::InUse,
                stamp: Stamp {
                    date: date(2),
                    time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                },
            })
            .await
            .unwrap();

        let updated = service.update(orphan.id, request(car.id, 3)).await.unwrap();
        assert!(updated.driver_identified);
        assert_eq!(updated.offending_driver_id, Some(ana));
        assert_eq!(service.list_for_driver(ana).await.unwrap().len(), 1);

        let missing = service.create(request(Uuid::new_v4(), 3)).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }
}
