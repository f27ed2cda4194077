//! Audit trail handlers
//!
//! Read-only access to the entity change history. Every create, update,
//! and delete that goes through the services lands here; this endpoint
//! is how operators answer "who changed what, and when".

use crate::dto::audit::{AuditEntryResponse, AuditQueryParams};
use crate::dto::PaginationParams;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use parkflow_core::models::{AuditFilter, EntityState};
use parkflow_core::traits::AuditQuery;
use parkflow_core::AppError;
use parkflow_db::PgAuditStore;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// List audit entries with optional filters, newest first
///
/// GET /api/v1/audits
#[instrument(skip(pool, query, filters))]
pub async fn list_audits(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    filters: web::Query<AuditQueryParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Audit query validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        "Listing audit entries"
    );

    // Parse date filters
    let start_created = if let Some(ref sd) = filters.start_date {
        Some(sd.parse::<DateTime<Utc>>().map_err(|_| {
            AppError::InvalidInput("Invalid start_date format. Use ISO 8601.".to_string())
        })?)
    } else {
        None
    };

    let end_created = if let Some(ref ed) = filters.end_date {
        Some(ed.parse::<DateTime<Utc>>().map_err(|_| {
            AppError::InvalidInput("Invalid end_date format. Use ISO 8601.".to_string())
        })?)
    } else {
        None
    };

    let entity_state = if let Some(ref state) = filters.entity_state {
        Some(
            EntityState::from_str(state)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown entity state '{state}'")))?,
        )
    } else {
        None
    };

    let filter = AuditFilter {
        entity_id: filters.entity_id,
        table_name: filters.table_name.clone(),
        entity_state,
        start_created,
        end_created,
    };

    let store = PgAuditStore::new(pool.get_ref().clone());
    let (entries, total) = store
        .find_filtered(&filter, query.limit(), query.offset())
        .await?;

    let responses: Vec<AuditEntryResponse> =
        entries.into_iter().map(AuditEntryResponse::from).collect();

    Ok(HttpResponse::Ok().json(query.paginate(responses, total)))
}

/// Configure audit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/audits").route("", web::get().to(list_audits)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_state_parsing() {
        assert_eq!(EntityState::from_str("Added"), Some(EntityState::Added));
        assert_eq!(EntityState::from_str("modified"), Some(EntityState::Modified));
        assert_eq!(EntityState::from_str("bogus"), None);
    }

    #[test]
    fn test_date_filter_parsing() {
        let parsed = "2026-03-01T10:00:00Z".parse::<DateTime<Utc>>();
        assert!(parsed.is_ok());
        assert!("not-a-date".parse::<DateTime<Utc>>().is_err());
    }
}
