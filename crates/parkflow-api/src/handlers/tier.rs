//! Price tier handlers
//!
//! HTTP handlers for price tier administration endpoints.

use crate::dto::tier::{TierCreateRequest, TierResponse, TierUpdateRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use parkflow_cache::RedisCache;
use parkflow_core::AppError;
use parkflow_db::{PgAuditStore, PgSpotRepository, PgTierRepository};
use parkflow_services::CatalogServiceImpl;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

type Catalog = CatalogServiceImpl<PgSpotRepository, PgTierRepository, RedisCache>;

fn catalog(pool: &web::Data<PgPool>, cache: &web::Data<RedisCache>) -> Catalog {
    let pg = pool.get_ref().clone();
    CatalogServiceImpl::new(
        Arc::new(PgSpotRepository::new(pg.clone())),
        Arc::new(PgTierRepository::new(pg.clone())),
        cache.clone().into_inner(),
        Arc::new(PgAuditStore::new(pg)),
    )
}

/// List active price tiers
///
/// GET /api/v1/tiers
#[instrument(skip(pool, cache))]
pub async fn list_tiers(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
) -> Result<HttpResponse, AppError> {
    debug!("Listing price tiers");

    let tiers = catalog(&pool, &cache).list_price_tiers().await?;
    let response: Vec<TierResponse> = tiers.into_iter().map(TierResponse::from).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Create a price tier
///
/// POST /api/v1/tiers
#[instrument(skip(pool, cache, req))]
pub async fn create_tier(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<TierCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Tier creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        spot_id = req.spot_id,
        min_hours = req.min_hours,
        max_hours = req.max_hours,
        "Creating price tier"
    );

    let created = catalog(&pool, &cache)
        .create_price_tier(req.to_entity())
        .await?;

    info!(id = created.lifecycle.id, spot_id = created.spot_id, "Price tier created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        TierResponse::from(created),
        "Price tier created successfully",
    )))
}

/// Update a price tier
///
/// PUT /api/v1/tiers
#[instrument(skip(pool, cache, req))]
pub async fn update_tier(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<TierUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Tier update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(id = req.id, "Updating price tier");

    let updated = catalog(&pool, &cache)
        .update_price_tier(req.to_entity())
        .await?;

    info!(id = updated.lifecycle.id, "Price tier updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        TierResponse::from(updated),
        "Price tier updated successfully",
    )))
}

/// Soft-delete a price tier
///
/// DELETE /api/v1/tiers/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_tier(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let tier_id = path.into_inner();
    debug!(id = tier_id, "Deleting price tier");

    catalog(&pool, &cache).delete_price_tier(tier_id).await?;

    info!(id = tier_id, "Price tier deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure price tier routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tiers")
            .route("", web::get().to(list_tiers))
            .route("", web::post().to(create_tier))
            .route("", web::put().to(update_tier))
            .route("/{id}", web::delete().to(delete_tier)),
    );
}
