//! Price tier repository implementation
//!
//! Provides PostgreSQL-backed storage for the hour-bounded price tiers
//! attached to parking spots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkflow_core::{
    models::{Lifecycle, PriceTier},
    traits::{Repository, TierRepository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of TierRepository
pub struct PgTierRepository {
    pool: PgPool,
}

impl PgTierRepository {
    /// Create a new price tier repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<PriceTier, i64> for PgTierRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PriceTier>> {
        debug!("Finding price tier by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, TierRow>(
            r#"
            SELECT
                id, spot_id, price, min_hours, max_hours,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM price_tiers
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding price tier {}: {}", id, e);
            AppError::Database(format!("Failed to find price tier: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<PriceTier>> {
        debug!(
            "Finding all price tiers with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, TierRow>(
            r#"
            SELECT
                id, spot_id, price, min_hours, max_hours,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM price_tiers
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
            error!("Database error finding price tiers: {}", e);
            AppError::Database(format!("Failed to fetch price tiers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM price_tiers WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting price tiers: {}", e);
                    AppError::Database(format!("Failed to count price tiers: {}", e))
                })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &PriceTier) -> AppResult<PriceTier> {
        debug!("Creating price tier for spot: {}", entity.spot_id);

        let row = sqlx::query_as::<sqlx::Postgres, TierRow>(
            r#"
            INSERT INTO price_tiers (
                spot_id, price, min_hours, max_hours,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, NOW(), $6)
            RETURNING
                id, spot_id, price, min_hours, max_hours,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.spot_id)
        .bind(entity.price)
        .bind(entity.min_hours)
        .bind(entity.max_hours)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating price tier: {}", e);
            AppError::Database(format!("Failed to create price tier: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &PriceTier) -> AppResult<PriceTier> {
        debug!("Updating price tier: {}", entity.lifecycle.id);

        let row = sqlx::query_as::<sqlx::Postgres, TierRow>(
            r#"
            UPDATE price_tiers
            SET spot_id = $2,
                price = $3,
                min_hours = $4,
                max_hours = $5,
                is_active = $6,
                updated_at = NOW(),
                updated_by = $7
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING
                id, spot_id, price, min_hours, max_hours,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            "#,
        )
        .bind(entity.lifecycle.id)
        .bind(entity.spot_id)
        .bind(entity.price)
        .bind(entity.min_hours)
        .bind(entity.max_hours)
        .bind(entity.lifecycle.is_active)
        .bind(entity.lifecycle.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error updating price tier {}: {}",
                entity.lifecycle.id, e
            );
            AppError::Database(format!("Failed to update price tier: {}", e))
        })?;

        row.map(Into::into)
            .ok_or_else(|| AppError::TierNotFound(entity.lifecycle.id.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Soft-deleting price tier: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE price_tiers
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
            error!("Database error deleting price tier {}: {}", id, e);
            AppError::Database(format!("Failed to delete price tier: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TierRepository for PgTierRepository {
    #[instrument(skip(self))]
    async fn find_active(&self) -> AppResult<Vec<PriceTier>> {
        debug!("Finding active price tiers");

        let rows = sqlx::query_as::<sqlx::Postgres, TierRow>(
            r#"
            SELECT
                id, spot_id, price, min_hours, max_hours,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM price_tiers
            WHERE is_active = TRUE AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active price tiers: {}", e);
            AppError::Database(format!("Failed to fetch price tiers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct TierRow {
    id: i64,
    spot_id: i64,
    price: Decimal,
    min_hours: i32,
    max_hours: i32,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<i64>,
}

impl From<TierRow> for PriceTier {
    fn from(row: TierRow) -> Self {
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
            spot_id: row.spot_id,
            price: row.price,
            min_hours: row.min_hours,
            max_hours: row.max_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion() {
        let row = TierRow {
            id: 3,
            spot_id: 7,
            price: dec!(10.00),
            min_hours: 0,
            max_hours: 24,
            is_active: true,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: 1,
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };

        let tier: PriceTier = row.into();
        assert_eq!(tier.lifecycle.id, 3);
        assert_eq!(tier.spot_id, 7);
        assert_eq!(tier.price, dec!(10.00));
        assert!(tier.covers(0));
        assert!(tier.covers(24));
        assert!(!tier.covers(25));
    }
}
