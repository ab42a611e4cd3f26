use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{UsageRepository, OPEN_USAGE_PER_USER, OPEN_USAGE_PER_VEHICLE};
use crate::models::{
    usage::{Transition, UsageRecord, UsageStatus},
    vehicle::VehicleStatus,
};
use crate::utils::errors::{unique_violation, AppError, AppResult};

pub struct PgUsageRepository {
    pool: PgPool,
}

impl PgUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const OPEN_FILTER: &str = "status IN ('reserved', 'in_use')";

#[async_trait]
impl UsageRepository for PgUsageRepository {
    async fn create_reservation(&self, usage: &UsageRecord) -> AppResult<UsageRecord> {
        let mut tx = self.pool.begin().await?;

        // Sólo se reserva un vehículo que sigue disponible
        let claimed = sqlx::query(
            "UPDATE vehicles SET status = $2, updated_at = now() WHERE id = $1 AND status = $3",
        )
        .bind(usage.vehicle_id)
        .bind(VehicleStatus::Reserved.as_str())
        .bind(VehicleStatus::Available.as_str())
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::Conflict(OPEN_USAGE_PER_VEHICLE.to_string()));
        }

        let created = sqlx::query_as::<_, UsageRecord>(
            r#"
            INSERT INTO vehicle_usage (
                id, vehicle_id, user_id, driver_name, vehicle_name, status,
                reserved_on, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(usage.id)
        .bind(usage.vehicle_id)
        .bind(usage.user_id)
        .bind(&usage.driver_name)
        .bind(&usage.vehicle_name)
        .bind(usage.status.as_str())
        .bind(usage.reserved_on)
        .bind(usage.created_at)
        .bind(usage.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation(&e)
                .and_then(|constraint| open_usage_conflict(&constraint))
                .unwrap_or_else(|| AppError::Database(e))
        })?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UsageRecord>> {
        let usage = sqlx::query_as::<_, UsageRecord>("SELECT * FROM vehicle_usage WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usage)
    }

    async fn find_open_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<UsageRecord>> {
        let usage = sqlx::query_as::<_, UsageRecord>(&format!(
            "SELECT * FROM vehicle_usage WHERE vehicle_id = $1 AND {} ORDER BY created_at DESC LIMIT 1",
            OPEN_FILTER
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usage)
    }

    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<UsageRecord>> {
        let usage = sqlx::query_as::<_, UsageRecord>(&format!(
            "SELECT * FROM vehicle_usage WHERE user_id = $1 AND {} ORDER BY created_at DESC LIMIT 1",
            OPEN_FILTER
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usage)
    }

    async fn list_open(&self) -> AppResult<Vec<UsageRecord>> {
        let usages = sqlx::query_as::<_, UsageRecord>(&format!(
            "SELECT * FROM vehicle_usage WHERE {} ORDER BY created_at DESC",
            OPEN_FILTER
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(usages)
    }

    async fn list_all(&self) -> AppResult<Vec<UsageRecord>> {
        let usages = sqlx::query_as::<_, UsageRecord>("SELECT * FROM vehicle_usage ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(usages)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<UsageRecord>> {
        let usages = sqlx::query_as::<_, UsageRecord>(
            "SELECT * FROM vehicle_usage WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usages)
    }

    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<UsageRecord>> {
        let usages = sqlx::query_as::<_, UsageRecord>(
            "SELECT * FROM vehicle_usage WHERE vehicle_id = $1 ORDER BY created_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usages)
    }

    async fn apply_transition(&self, transition: &Transition) -> AppResult<Option<UsageRecord>> {
        let sql = match transition.to {
            UsageStatus::InUse => {
                r#"
                UPDATE vehicle_usage
                SET status = $3, picked_up_on = $4, picked_up_at = $5, updated_at = now()
                WHERE id = $1 AND status = $2
                RETURNING *
                "#
            }
            UsageStatus::Finalized => {
                r#"
                UPDATE vehicle_usage
                SET status = $3, returned_on = $4, returned_at = $5, updated_at = now()
                WHERE id = $1 AND status = $2
                RETURNING *
                "#
            }
            UsageStatus::Reserved => {
                return Err(AppError::Internal(format!(
                    "transition {} -> {} is not supported",
                    transition.from, transition.to
                )))
            }
        };

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, UsageRecord>(sql)
            .bind(transition.usage_id)
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(transition.stamp.date)
            .bind(transition.stamp.time)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(usage) = updated else {
            return Ok(None);
        };

        sqlx::query("UPDATE vehicles SET status = $2, updated_at = now() WHERE id = $1")
            .bind(usage.vehicle_id)
            .bind(VehicleStatus::mirroring(usage.status).as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(usage))
    }
}

/// Sólo los índices de registro abierto son conflictos de reserva;
/// cualquier otra unicidad (p. ej. la clave primaria) es un error de base de datos
fn open_usage_conflict(constraint: &str) -> Option<AppError> {
    match constraint {
        OPEN_USAGE_PER_USER | OPEN_USAGE_PER_VEHICLE => Some(AppError::Conflict(constraint.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_usage_indexes_are_conflicts() {
        for constraint in [OPEN_USAGE_PER_USER, OPEN_USAGE_PER_VEHICLE] {
            match open_usage_conflict(constraint) {
                Some(AppError::Conflict(name)) => assert_eq!(name, constraint),
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_other_unique_violations_are_not_conflicts() {
        assert!(open_usage_conflict("vehicle_usage_pkey").is_none());
        assert!(open_usage_conflict("").is_none());
    }
}
