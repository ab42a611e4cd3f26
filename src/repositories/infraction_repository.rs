use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::InfractionRepository;
use crate::models::infraction::Infraction;
use crate::utils::errors::{AppError, AppResult};

pub struct PgInfractionRepository {
    pool: PgPool,
}

impl PgInfractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InfractionRepository for PgInfractionRepository {
    async fn create(&self, infraction: &Infraction) -> AppResult<Infraction> {
        let result = sqlx::query_as::<_, Infraction>(
            r#"
            INSERT INTO infractions (
                id, vehicle_id, vehicle_name, ticket_number, renainf, infraction_date, infraction_time,
                location, description, infraction_type, offender, status, original_fine, original_amount,
                net_amount, appeal_deadline, identification_deadline, due_date, slip_printed,
                driver_identified, offending_driver_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(infraction.id)
        .bind(infraction.vehicle_id)
        .bind(&infraction.vehicle_name)
        .bind(&infraction.ticket_number)
        .bind(&infraction.renainf)
        .bind(infraction.infraction_date)
        .bind(infraction.infraction_time)
        .bind(&infraction.location)
        .bind(&infraction.description)
        .bind(&infraction.infraction_type)
        .bind(&infraction.offender)
        .bind(&infraction.status)
        .bind(infraction.original_fine)
        .bind(infraction.original_amount)
        .bind(infraction.net_amount)
        .bind(infraction.appeal_deadline)
        .bind(infraction.identification_deadline)
        .bind(infraction.due_date)
        .bind(infraction.slip_printed)
        .bind(infraction.driver_identified)
        .bind(infraction.offending_driver_id)
        .bind(infraction.created_at)
        .bind(infraction.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn update(&self, infraction: &Infraction) -> AppResult<Infraction> {
        sqlx::query_as::<_, Infraction>(
            r#"
            UPDATE infractions
            SET vehicle_id = $2, vehicle_name = $3, ticket_number = $4, renainf = $5, infraction_date = $6,
                infraction_time = $7, location = $8, description = $9, infraction_type = $10, offender = $11,
                status = $12, original_fine = $13, original_amount = $14, net_amount = $15,
                appeal_deadline = $16, identification_deadline = $17, due_date = $18, slip_printed = $19,
                driver_identified = $20, offending_driver_id = $21, updated_at = $22
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(infraction.id)
        .bind(infraction.vehicle_id)
        .bind(&infraction.vehicle_name)
        .bind(&infraction.ticket_number)
        .bind(&infraction.renainf)
        .bind(infraction.infraction_date)
        .bind(infraction.infraction_time)
        .bind(&infraction.location)
        .bind(&infraction.description)
        .bind(&infraction.infraction_type)
        .bind(&infraction.offender)
        .bind(&infraction.status)
        .bind(infraction.original_fine)
        .bind(infraction.original_amount)
        .bind(infraction.net_amount)
        .bind(infraction.appeal_deadline)
        .bind(infraction.identification_deadline)
        .bind(infraction.due_date)
        .bind(infraction.slip_printed)
        .bind(infraction.driver_identified)
        .bind(infraction.offending_driver_id)
        .bind(infraction.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Infraction not found".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Infraction>> {
        let result = sqlx::query_as::<_, Infraction>("SELECT * FROM infractions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn list(&self) -> AppResult<Vec<Infraction>> {
        let result = sqlx::query_as::<_, Infraction>(
            "SELECT * FROM infractions ORDER BY infraction_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    async fn list_by_driver(&self, user_id: Uuid) -> AppResult<Vec<Infraction>> {
        let result = sqlx::query_as::<_, Infraction>(
            "SELECT * FROM infractions WHERE offending_driver_id = $1 ORDER BY infraction_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM infractions")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
