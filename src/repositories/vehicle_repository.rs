use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{VehicleOrder, VehicleRepository, UNIQUE_LICENSE_PLATE};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{unique_violation, AppError, AppResult};

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match unique_violation(&e) {
        Some(_) => AppError::Conflict(UNIQUE_LICENSE_PLATE.to_string()),
        None => AppError::Database(e),
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, license_plate, registration_number, name, company, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.name)
        .bind(&vehicle.company)
        .bind(vehicle.status.as_str())
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list(&self, order: VehicleOrder) -> AppResult<Vec<Vehicle>> {
        let sql = match order {
            VehicleOrder::ByName => "SELECT * FROM vehicles ORDER BY name ASC",
            VehicleOrder::NewestFirst => "SELECT * FROM vehicles ORDER BY created_at DESC",
        };
        let vehicles = sqlx::query_as::<_, Vehicle>(sql).fetch_all(&self.pool).await?;

        Ok(vehicles)
    }

    async fn license_plate_exists(&self, license_plate: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(license_plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET license_plate = $2, registration_number = $3, name = $4, company = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.name)
        .bind(&vehicle.company)
        .bind(vehicle.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
