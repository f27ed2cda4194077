//! Audit trail store implementation
//!
//! Provides PostgreSQL-backed storage for audit entries and application
//! logs. Both tables are append-only; reads serve the filtered trail query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parkflow_core::{
    models::{AuditEntry, AuditFilter, EntityState, Lifecycle, LogEntry, LogLevel},
    traits::{AuditQuery, AuditSink},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL store for audit entries and application logs
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    /// Create a new audit store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditStore {
    #[instrument(skip(self, entry))]
    async fn record_change(&self, entry: &AuditEntry) -> AppResult<()> {
        debug!(
            "Recording {} change on {} {}",
            entry.entity_state, entry.table_name, entry.entity_id
        );

        sqlx::query(
            r#"
            INSERT INTO audits (
                entity_id, table_name, old_values, new_values, entity_state,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW(), $7)
            "#,
        )
        .bind(entry.entity_id)
        .bind(&entry.table_name)
        .bind(&entry.old_values)
        .bind(&entry.new_values)
        .bind(entry.entity_state.to_string())
        .bind(entry.lifecycle.is_active)
        .bind(entry.lifecycle.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error recording audit entry: {}", e);
            AppError::Database(format!("Failed to record audit entry: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self, short_message, full_message))]
    async fn append_log(
        &self,
        level: LogLevel,
        short_message: &str,
        full_message: &str,
    ) -> AppResult<()> {
        let entry = LogEntry::new(level, short_message, full_message);

        sqlx::query(
            r#"
            INSERT INTO logs (
                level_code, short_message, full_message,
                is_active, is_deleted, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, FALSE, NOW(), $5)
            "#,
        )
        .bind(entry.level.code())
        .bind(&entry.short_message)
        .bind(&entry.full_message)
        .bind(entry.lifecycle.is_active)
        .bind(entry.lifecycle.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error appending log entry: {}", e);
            AppError::Database(format!("Failed to append log entry: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl AuditQuery for PgAuditStore {
    #[instrument(skip(self))]
    async fn find_filtered(
        &self,
        filter: &AuditFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<AuditEntry>, i64)> {
        debug!(
            "Finding audit entries with limit {} offset {}",
            limit, offset
        );

        let state = filter.entity_state.map(|s| s.to_string());

        let rows = sqlx::query_as::<sqlx::Postgres, AuditRow>(
            r#"
            SELECT
                id, entity_id, table_name, old_values, new_values, entity_state,
                is_active, is_deleted,
                created_at, created_by, updated_at, updated_by,
                deleted_at, deleted_by
            FROM audits
            WHERE is_deleted = FALSE
              AND ($1::BIGINT IS NULL OR entity_id = $1)
              AND ($2::TEXT IS NULL OR table_name ILIKE '%' || $2 || '%')
              AND ($3::TEXT IS NULL OR entity_state = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at <= $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.entity_id)
        .bind(filter.table_name.as_deref())
        .bind(state.as_deref())
        .bind(filter.start_created)
        .bind(filter.end_created)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding audit entries: {}", e);
            AppError::Database(format!("Failed to fetch audit entries: {}", e))
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM audits
            WHERE is_deleted = FALSE
              AND ($1::BIGINT IS NULL OR entity_id = $1)
              AND ($2::TEXT IS NULL OR table_name ILIKE '%' || $2 || '%')
              AND ($3::TEXT IS NULL OR entity_state = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at <= $5)
            "#,
        )
        .bind(filter.entity_id)
        .bind(filter.table_name.as_deref())
        .bind(state.as_deref())
        .bind(filter.start_created)
        .bind(filter.end_created)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting audit entries: {}", e);
            AppError::Database(format!("Failed to count audit entries: {}", e))
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: i64,
    entity_id: i64,
    table_name: String,
    old_values: Option<String>,
    new_values: Option<String>,
    entity_state: String,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<i64>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
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
            entity_id: row.entity_id,
            table_name: row.table_name,
            old_values: row.old_values,
            new_values: row.new_values,
            entity_state: EntityState::from_str(&row.entity_state)
                .unwrap_or(EntityState::Modified),
        }
    }
}
