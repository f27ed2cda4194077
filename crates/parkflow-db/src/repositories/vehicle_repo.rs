//! Vehicle repository implementation
//!
//! Provides PostgreSQL-backed storage for vehicle stays, including the
//! entry/exit timestamps and the settled fee.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkflow_core::{
    models::{Lifecycle, SizeClass, Vehicle},
    traits::{Repository, VehicleRepository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of VehicleRepository
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Vehicle, i64> for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        debug!("Finding vehicle by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM vehicles
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to find vehicle: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Vehicle>> {
        debug!(
            "Finding all vehicles with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM vehicles
            WHERE is_deleted = FALSE
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicles: {}", e);
            AppError::Database(format!("Failed to fetch vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting vehicles: {}", e);
                    AppError::Database(format!("Failed to count vehicles: {}", e))
                })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Creating vehicle: {}", entity.license_plate);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            INSERT INTO vehicles (
                license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW(), $7)
            RETURNING
                id, license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(&entity.license_plate)
        .bind(entity.size.to_string())
        .bind(entity.entry_time)
        .bind(entity.exit_time)
        .bind(entity.total_fee)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating vehicle: {}", e);
            AppError::Database(format!("Failed to create vehicle: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Updating vehicle: {}", entity.lifecycle.id);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            UPDATE vehicles
            SET license_plate = $2,
                size = $3,
                entry_time = $4,
                exit_time = $5,
                total_fee = $6,
                is_active = $7,
                updated_at = NOW(),
                updated_by = $8
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING
                id, license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.lifecycle.id)
        .bind(&entity.license_plate)
        .bind(entity.size.to_string())
        .bind(entity.entry_time)
        .bind(entity.exit_time)
        .bind(entity.total_fee)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error updating vehicle {}: {}",
                entity.lifecycle.id, e
            );
            AppError::Database(format!("Failed to update vehicle: {}", e))
        })?;

        row.map(Into::into)
            .ok_or_else(|| AppError::VehicleNotFound(entity.lifecycle.id.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Soft-deleting vehicle: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET is_active = FALSE,
                is_deleted = TRUE,
                deleted_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error deleting vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to delete vehicle: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_active(&self) -> AppResult<Vec<Vehicle>> {
        debug!("Finding active vehicles");

        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, license_plate, size, entry_time, exit_time, total_fee,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM vehicles
            WHERE is_active = TRUE AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active vehicles: {}", e);
            AppError::Database(format!("Failed to fetch vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: i64,
    license_plate: String,
    size: String,
    entry_time: DateTime<Utc>,
    exit_time: Option<DateTime<Utc>>,
    total_fee: Decimal,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<i64>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            lifecycle: Lifecycle {
                id: row.id,
                is_active: row.is_active,
                is_deleted: row.is_deleted,
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
                deleted_at: row.deleted_at,
                deleted_by: row.deleted_by,
            },
            license_plate: row.license_plate,
            size: SizeClass::from_str(&row.size).unwrap_or_default(),
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            total_fee: row.total_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion() {
        let entry = Utc::now();
        let row = VehicleRow {
            id: 11,
            license_plate: "34AB123".to_string(),
            size: "small".to_string(),
            entry_time: entry,
            exit_time: None,
            total_fee: dec!(0),
            is_active: true,
            is_deleted: false,
            created_at: entry,
            created_by: 1,
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };

        let vehicle: Vehicle = row.into();
        assert_eq!(vehicle.lifecycle.id, 11);
        assert_eq!(vehicle.license_plate, "34AB123");
        assert_eq!(vehicle.size, SizeClass::Small);
        assert_eq!(vehicle.entry_time, entry);
        assert!(vehicle.exit_time.is_none());
        assert_eq!(vehicle.total_fee, dec!(0));
    }
}
