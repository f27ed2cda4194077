//! Parking spot handlers
//!
//! HTTP handlers for spot administration endpoints.

use crate::dto::spot::{SpotCreateRequest, SpotResponse, SpotUpdateRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use parkflow_cache::RedisCache;
use parkflow_core::models::SizeClass;
use parkflow_core::traits::CatalogService;
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

/// List active parking spots
///
/// GET /api/v1/spots
#[instrument(skip(pool, cache))]
pub async fn list_spots(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
) -> Result<HttpResponse, AppError> {
    debug!("Listing parking spots");

    let spots = catalog(&pool, &cache).list_spots().await?;
    let response: Vec<SpotResponse> = spots.into_iter().map(SpotResponse::from).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Get a single parking spot by id
///
/// GET /api/v1/spots/{id}
#[instrument(skip(pool, cache))]
pub async fn get_spot(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    debug!(id = spot_id, "Getting parking spot");

    let spot = catalog(&pool, &cache).get_spot_by_id(spot_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SpotResponse::from(spot))))
}

/// Get the first active parking spot of a size class
///
/// GET /api/v1/spots/size/{size}
#[instrument(skip(pool, cache))]
pub async fn get_spot_by_size(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let raw = path.into_inner();
    let size = SizeClass::from_str(&raw)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown size class '{}'", raw)))?;

    debug!(%size, "Getting parking spot by size");

    let spot = catalog(&pool, &cache).get_spot_by_size(size).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SpotResponse::from(spot))))
}

/// Create a parking spot
///
/// POST /api/v1/spots
#[instrument(skip(pool, cache, req))]
pub async fn create_spot(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<SpotCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Spot creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(name = %req.name, size = %req.size, "Creating parking spot");

    let created = catalog(&pool, &cache).create_spot(req.to_entity()).await?;

    info!(id = created.lifecycle.id, name = %created.name, "Parking spot created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        SpotResponse::from(created),
        "Parking spot created successfully",
    )))
}

/// Update a parking spot
///
/// PUT /api/v1/spots
#[instrument(skip(pool, cache, req))]
pub async fn update_spot(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<SpotUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Spot update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(id = req.id, "Updating parking spot");

    let updated = catalog(&pool, &cache).update_spot(req.to_entity()).await?;

    info!(id = updated.lifecycle.id, "Parking spot updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        SpotResponse::from(updated),
        "Parking spot updated successfully",
    )))
}

/// Soft-delete a parking spot
///
/// DELETE /api/v1/spots/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_spot(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    debug!(id = spot_id, "Deleting parking spot");

    catalog(&pool, &cache).delete_spot(spot_id).await?;

    info!(id = spot_id, "Parking spot deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure parking spot routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spots")
            .route("", web::get().to(list_spots))
            .route("", web::post().to(create_spot))
            .route("", web::put().to(update_spot))
            .route("/size/{size}", web::get().to(get_spot_by_size))
            .route("/{id}", web::get().to(get_spot))
            .route("/{id}", web::delete().to(delete_spot)),
    );
}
