//! Store en memoria
//!
//! Implementa los cuatro repositorios sobre tablas protegidas por un único
//! `RwLock`, aplicando las mismas restricciones de unicidad que el esquema
//! PostgreSQL. Se usa en tests y con `STORE_BACKEND=memory`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    InfractionRepository, UsageRepository, UserRepository, VehicleOrder, VehicleRepository,
    OPEN_USAGE_PER_USER, OPEN_USAGE_PER_VEHICLE, UNIQUE_LICENSE_PLATE, UNIQUE_USER_EMAIL,
};
use crate::models::{
    infraction::Infraction,
    usage::{Transition, UsageRecord},
    user::{User, UserRole},
    vehicle::{Vehicle, VehicleStatus},
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    vehicles: HashMap<Uuid, Vehicle>,
    users: HashMap<Uuid, User>,
    usages: HashMap<Uuid, UsageRecord>,
    infractions: HashMap<Uuid, Infraction>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.values().any(|v| v.license_plate == vehicle.license_plate) {
            return Err(AppError::Conflict(UNIQUE_LICENSE_PLATE.to_string()));
        }
        tables.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn list(&self, order: VehicleOrder) -> AppResult<Vec<Vehicle>> {
        let vehicles: Vec<Vehicle> = self.tables.read().await.vehicles.values().cloned().collect();
        Ok(match order {
            VehicleOrder::NewestFirst => newest_first(vehicles, |v| v.created_at),
            VehicleOrder::ByName => {
                let mut vehicles = vehicles;
                vehicles.sort_by(|a, b| a.name.cmp(&b.name));
                vehicles
            }
        })
    }

    async fn license_plate_exists(&self, license_plate: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .vehicles
            .values()
            .any(|v| v.license_plate == license_plate && Some(v.id) != exclude))
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables
            .vehicles
            .values()
            .any(|v| v.license_plate == vehicle.license_plate && v.id != vehicle.id)
        {
            return Err(AppError::Conflict(UNIQUE_LICENSE_PLATE.to_string()));
        }
        let stored = tables
            .vehicles
            .get_mut(&vehicle.id)
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        // El estado no se toca desde aquí
        let status = stored.status;
        *stored = Vehicle {
            status,
            ..vehicle.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.vehicles.remove(&id).is_some();
        if removed {
            tables.usages.retain(|_, u| u.vehicle_id != id);
            tables.infractions.retain(|_, i| i.vehicle_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict(UNIQUE_USER_EMAIL.to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(UserRepository::find_by_email(self, email).await?.is_some())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.active = active;
            user.updated_at = chrono::Utc::now();
            user.clone()
        }))
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = chrono::Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl UsageRepository for InMemoryStore {
    async fn create_reservation(&self, usage: &UsageRecord) -> AppResult<UsageRecord> {
        let mut tables = self.tables.write().await;

        if tables.usages.values().any(|u| u.user_id == usage.user_id && u.status.is_open()) {
            return Err(AppError::Conflict(OPEN_USAGE_PER_USER.to_string()));
        }
        let vehicle_busy = tables.usages.values().any(|u| u.vehicle_id == usage.vehicle_id && u.status.is_open());

        let vehicle = tables
            .vehicles
            .get_mut(&usage.vehicle_id)
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
        if vehicle_busy || vehicle.status != VehicleStatus::Available {
            return Err(AppError::Conflict(OPEN_USAGE_PER_VEHICLE.to_string()));
        }
        vehicle.status = VehicleStatus::Reserved;
        vehicle.updated_at = chrono::Utc::now();

        tables.usages.insert(usage.id, usage.clone());
        Ok(usage.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UsageRecord>> {
        Ok(self.tables.read().await.usages.get(&id).cloned())
    }

    async fn find_open_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<UsageRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .usages
            .values()
            .find(|u| u.vehicle_id == vehicle_id && u.status.is_open())
            .cloned())
    }

    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<UsageRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .usages
            .values()
            .find(|u| u.user_id == user_id && u.status.is_open())
            .cloned())
    }

    async fn list_open(&self) -> AppResult<Vec<UsageRecord>> {
        let usages: Vec<UsageRecord> = self
            .tables
            .read()
            .await
            .usages
            .values()
            .filter(|u| u.status.is_open())
            .cloned()
            .collect();
        Ok(newest_first(usages, |u: &UsageRecord| u.created_at))
    }

    async fn list_all(&self) -> AppResult<Vec<UsageRecord>> {
        let usages: Vec<UsageRecord> = self.tables.read().await.usages.values().cloned().collect();
        Ok(newest_first(usages, |u: &UsageRecord| u.created_at))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<UsageRecord>> {
        let usages: Vec<UsageRecord> = self
            .tables
            .read()
            .await
            .usages
            .values()
            .filter(|u| u.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(usages, |u: &UsageRecord| u.created_at))
    }

    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<UsageRecord>> {
        let usages: Vec<UsageRecord> = self
            .tables
            .read()
            .await
            .usages
            .values()
            .filter(|u| u.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        Ok(newest_first(usages, |u: &UsageRecord| u.created_at))
    }

    async fn apply_transition(&self, transition: &Transition) -> AppResult<Option<UsageRecord>> {
        let mut tables = self.tables.write().await;

        let Some(usage) = tables.usages.get_mut(&transition.usage_id) else {
            return Ok(None);
        };
        if !usage.apply(transition) {
            return Ok(None);
        }
        let usage = usage.clone();

        if let Some(vehicle) = tables.vehicles.get_mut(&usage.vehicle_id) {
            vehicle.status = VehicleStatus::mirroring(usage.status);
            vehicle.updated_at = chrono::Utc::now();
        }
        Ok(Some(usage))
    }
}

#[async_trait]
impl InfractionRepository for InMemoryStore {
    async fn create(&self, infraction: &Infraction) -> AppResult<Infraction> {
        let mut tables = self.tables.write().await;
        tables.infractions.insert(infraction.id, infraction.clone());
        Ok(infraction.clone())
    }

    async fn update(&self, infraction: &Infraction) -> AppResult<Infraction> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .infractions
            .get_mut(&infraction.id)
            .ok_or_else(|| AppError::NotFound("Infraction not found".to_string()))?;
        *stored = infraction.clone();
        Ok(infraction.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Infraction>> {
        Ok(self.tables.read().await.infractions.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Infraction>> {
        let mut infractions: Vec<Infraction> = self.tables.read().await.infractions.values().cloned().collect();
        infractions.sort_by(|a, b| {
            b.infraction_date
                .cmp(&a.infraction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(infractions)
    }

    async fn list_by_driver(&self, user_id: Uuid) -> AppResult<Vec<Infraction>> {
        let mut infractions: Vec<Infraction> = self
            .tables
            .read()
            .await
            .infractions
            .values()
            .filter(|i| i.offending_driver_id == Some(user_id))
            .cloned()
            .collect();
        infractions.sort_by(|a, b| b.infraction_date.cmp(&a.infraction_date));
        Ok(infractions)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.infractions.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usage::{NewReservation, Stamp, UsageStatus};
    use crate::models::vehicle::NewVehicle;
    use chrono::{NaiveDate, NaiveTime};

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::new(NewVehicle {
            license_plate: plate.to_string(),
            registration_number: "12345678901".to_string(),
            name: "Fiat Uno".to_string(),
            company: "Frota Sul".to_string(),
        })
    }

    fn reservation(vehicle_id: Uuid, user_id: Uuid) -> UsageRecord {
        UsageRecord::reserve(NewReservation {
            vehicle_id,
            user_id,
            driver_name: "Ana".to_string(),
            vehicle_name: "Fiat Uno".to_string(),
            reserved_on: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        })
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_rejected() {
        let store = InMemoryStore::new();
        VehicleRepository::create(&store, &vehicle("ABC1234")).await.unwrap();
        let err = VehicleRepository::create(&store, &vehicle("ABC1234")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(c) if c == UNIQUE_LICENSE_PLATE));
    }

    #[tokio::test]
    async fn test_reservation_marks_vehicle_and_blocks_second_open_record() {
        let store = InMemoryStore::new();
        let car = VehicleRepository::create(&store, &vehicle("ABC1234")).await.unwrap();
        let (ana, bia) = (Uuid::new_v4(), Uuid::new_v4());

        store.create_reservation(&reservation(car.id, ana)).await.unwrap();
        let stored = VehicleRepository::find_by_id(&store, car.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VehicleStatus::Reserved);

        let err = store.create_reservation(&reservation(car.id, bia)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(c) if c == OPEN_USAGE_PER_VEHICLE));
    }

    #[tokio::test]
    async fn test_stale_transition_returns_none() {
        let store = InMemoryStore::new();
        let car = VehicleRepository::create(&store, &vehicle("ABC1234")).await.unwrap();
        let usage = store.create_reservation(&reservation(car.id, Uuid::new_v4())).await.unwrap();

        let give_back = Transition {
            usage_id: usage.id,
            from: UsageStatus::InUse,
            to: UsageStatus::Finalized,
            stamp: Stamp {
                date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
                time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
        };
        assert!(store.apply_transition(&give_back).await.unwrap().is_none());

        let stored = VehicleRepository::find_by_id(&store, car.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VehicleStatus::Reserved);
    }

    #[tokio::test]
    async fn test_emails_are_case_insensitive() {
        let store = InMemoryStore::new();
        let user = User::new("Ana@Frota.com".to_string(), "hash".to_string(), "Ana".to_string(), UserRole::User);
        UserRepository::create(&store, &user).await.unwrap();
        assert!(store.email_exists("ana@frota.com").await.unwrap());
    }
}
