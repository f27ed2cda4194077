//! Parking spot repository implementation
//!
//! Provides PostgreSQL-backed storage for parking spots. All reads filter
//! out soft-deleted rows; deletes only flip the lifecycle flags.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkflow_core::{
    models::{Lifecycle, ParkingSpot, SizeClass},
    traits::{Repository, SpotRepository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of SpotRepository
pub struct PgSpotRepository {
    pool: PgPool,
}

impl PgSpotRepository {
    /// Create a new parking spot repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<ParkingSpot, i64> for PgSpotRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingSpot>> {
        debug!("Finding parking spot by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            SELECT
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM parking_spots
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding parking spot {}: {}", id, e);
            AppError::Database(format!("Failed to find parking spot: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<ParkingSpot>> {
        debug!(
            "Finding all parking spots with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            SELECT
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM parking_spots
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
            error!("Database error finding parking spots: {}", e);
            AppError::Database(format!("Failed to fetch parking spots: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM parking_spots WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting parking spots: {}", e);
                    AppError::Database(format!("Failed to count parking spots: {}", e))
                })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &ParkingSpot) -> AppResult<ParkingSpot> {
        debug!("Creating parking spot: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            INSERT INTO parking_spots (
                name, size, max_capacity,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, FALSE, NOW(), $5)
            RETURNING
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(&entity.name)
        .bind(entity.size.to_string())
        .bind(entity.max_capacity)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating parking spot: {}", e);
            AppError::Database(format!("Failed to create parking spot: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &ParkingSpot) -> AppResult<ParkingSpot> {
        debug!("Updating parking spot: {}", entity.lifecycle.id);

        let row = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            UPDATE parking_spots
            SET name = $2,
                size = $3,
                max_capacity = $4,
                is_active = $5,
                updated_at = NOW(),
                updated_by = $6
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.lifecycle.id)
        .bind(&entity.name)
        .bind(entity.size.to_string())
        .bind(entity.max_capacity)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error updating parking spot {}: {}",
                entity.lifecycle.id, e
            );
            AppError::Database(format!("Failed to update parking spot: {}", e))
        })?;

        row.map(Into::into)
            .ok_or_else(|| AppError::SpotNotFound(entity.lifecycle.id.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Soft-deleting parking spot: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE parking_spots
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
            error!("Database error deleting parking spot {}: {}", id, e);
            AppError::Database(format!("Failed to delete parking spot: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SpotRepository for PgSpotRepository {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> AppResult<Option<ParkingSpot>> {
        debug!("Finding parking spot by name: {}", name);

        let result = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            SELECT
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM parking_spots
            WHERE name = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding parking spot {}: {}", name, e);
            AppError::Database(format!("Failed to find parking spot: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_active(&self) -> AppResult<Vec<ParkingSpot>> {
        debug!("Finding active parking spots");

        let rows = sqlx::query_as::<sqlx::Postgres, SpotRow>(
            r#"
            SELECT
                id, name, size, max_capacity,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM parking_spots
            WHERE is_active = TRUE AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active parking spots: {}", e);
            AppError::Database(format!("Failed to fetch parking spots: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SpotRow {
    id: i64,
    name: String,
    size: String,
    max_capacity: i32,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<i64>,
}

impl From<SpotRow> for ParkingSpot {
    fn from(row: SpotRow) -> Self {
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
            name: row.name,
            size: SizeClass::from_str(&row.size).unwrap_or_default(),
            max_capacity: row.max_capacity,
        }
    }
}
