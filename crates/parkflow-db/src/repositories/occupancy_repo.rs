//! Occupancy mapping repository implementation
//!
//! Provides PostgreSQL-backed storage for the vehicle-to-spot mappings
//! that track which vehicles currently occupy which spots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkflow_core::{
    models::{Lifecycle, OccupancyMapping},
    traits::{OccupancyRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of OccupancyRepository
pub struct PgOccupancyRepository {
    pool: PgPool,
}

impl PgOccupancyRepository {
    /// Create a new occupancy mapping repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<OccupancyMapping, i64> for PgOccupancyRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<OccupancyMapping>> {
        debug!("Finding occupancy mapping by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            SELECT
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM occupancy_mappings
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding occupancy mapping {}: {}", id, e);
            AppError::Database(format!("Failed to find occupancy mapping: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<OccupancyMapping>> {
        debug!(
            "Finding all occupancy mappings with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            SELECT
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM occupancy_mappings
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
            error!("Database error finding occupancy mappings: {}", e);
            AppError::Database(format!("Failed to fetch occupancy mappings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM occupancy_mappings WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting occupancy mappings: {}", e);
                    AppError::Database(format!("Failed to count occupancy mappings: {}", e))
                })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &OccupancyMapping) -> AppResult<OccupancyMapping> {
        debug!(
            "Creating occupancy mapping: vehicle {} -> spot {}",
            entity.vehicle_id, entity.spot_id
        );

        let row = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            INSERT INTO occupancy_mappings (
                vehicle_id, spot_id,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, FALSE, NOW(), $4)
            RETURNING
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.vehicle_id)
        .bind(entity.spot_id)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating occupancy mapping: {}", e);
            AppError::Database(format!("Failed to create occupancy mapping: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &OccupancyMapping) -> AppResult<OccupancyMapping> {
        debug!("Updating occupancy mapping: {}", entity.lifecycle.id);

        let row = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            UPDATE occupancy_mappings
            SET vehicle_id = $2,
                spot_id = $3,
                is_active = $4,
                updated_at = NOW(),
                updated_by = $5
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.lifecycle.id)
        .bind(entity.vehicle_id)
        .bind(entity.spot_id)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error updating occupancy mapping {}: {}",
                entity.lifecycle.id, e
            );
            AppError::Database(format!("Failed to update occupancy mapping: {}", e))
        })?;

        row.map(Into::into)
            .ok_or_else(|| AppError::MappingNotFound(entity.lifecycle.id.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Soft-deleting occupancy mapping: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE occupancy_mappings
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
            error!("Database error deleting occupancy mapping {}: {}", id, e);
            AppError::Database(format!("Failed to delete occupancy mapping: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OccupancyRepository for PgOccupancyRepository {
    #[instrument(skip(self))]
    async fn find_active(&self) -> AppResult<Vec<OccupancyMapping>> {
        debug!("Finding active occupancy mappings");

        let rows = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            SELECT
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM occupancy_mappings
            WHERE is_active = TRUE AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active occupancy mappings: {}", e);
            AppError::Database(format!("Failed to fetch occupancy mappings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_active_by_spot(&self, spot_id: i64) -> AppResult<Vec<OccupancyMapping>> {
        debug!("Finding active occupancy mappings for spot: {}", spot_id);

        let rows = sqlx::query_as::<sqlx::Postgres, OccupancyRow>(
            r#"
            SELECT
                id, vehicle_id, spot_id,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM occupancy_mappings
            WHERE spot_id = $1 AND is_active = TRUE AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error finding occupancy mappings for spot {}: {}",
                spot_id, e
            );
            AppError::Database(format!("Failed to fetch occupancy mappings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct OccupancyRow {
    id: i64,
    vehicle_id: i64,
    spot_id: i64,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<i64>,
}

impl From<OccupancyRow> for OccupancyMapping {
    fn from(row: OccupancyRow) -> Self {
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
            vehicle_id: row.vehicle_id,
            spot_id: row.spot_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = OccupancyRow {
            id: 5,
            vehicle_id: 11,
            spot_id: 7,
            is_active: true,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: 1,
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };

        let mapping: OccupancyMapping = row.into();
        assert_eq!(mapping.lifecycle.id, 5);
        assert_eq!(mapping.vehicle_id, 11);
        assert_eq!(mapping.spot_id, 7);
        assert!(mapping.lifecycle.is_current());
    }
}
