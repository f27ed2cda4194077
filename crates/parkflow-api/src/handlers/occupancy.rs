//! Occupancy mapping handlers
//!
//! HTTP handlers for vehicle-to-spot occupancy administration. Admission
//! normally opens mappings itself; these endpoints exist for corrections
//! and for inspecting which vehicles occupy a spot.

use crate::dto::occupancy::{OccupancyCreateRequest, OccupancyResponse, OccupancyUpdateRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use parkflow_cache::RedisCache;
use parkflow_core::AppError;
use parkflow_db::{
    PgAuditStore, PgOccupancyRepository, PgSpotRepository, PgTierRepository, PgVehicleRepository,
};
use parkflow_services::{CatalogServiceImpl, VehicleService};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

type Vehicles = VehicleService<
    PgVehicleRepository,
    PgOccupancyRepository,
    RedisCache,
    CatalogServiceImpl<PgSpotRepository, PgTierRepository, RedisCache>,
>;

fn vehicles(pool: &web::Data<PgPool>, cache: &web::Data<RedisCache>) -> Vehicles {
    let pg = pool.get_ref().clone();
    let redis = cache.clone().into_inner();
    let audit = Arc::new(PgAuditStore::new(pg.clone()));
    let catalog = Arc::new(CatalogServiceImpl::new(
        Arc::new(PgSpotRepository::new(pg.clone())),
        Arc::new(PgTierRepository::new(pg.clone())),
        redis.clone(),
        audit.clone(),
    ));
    VehicleService::new(
        Arc::new(PgVehicleRepository::new(pg.clone())),
        Arc::new(PgOccupancyRepository::new(pg)),
        redis,
        catalog,
        audit,
    )
}

/// Create an occupancy mapping
///
/// POST /api/v1/occupancy
#[instrument(skip(pool, cache, req))]
pub async fn create_occupancy(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<OccupancyCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Occupancy creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        vehicle_id = req.vehicle_id,
        spot_id = req.spot_id,
        "Creating occupancy mapping"
    );

    let created = vehicles(&pool, &cache).create_occupancy(req.to_entity()).await?;

    info!(id = created.lifecycle.id, "Occupancy mapping created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        OccupancyResponse::from(created),
        "Occupancy mapping created successfully",
    )))
}

/// List live occupancy mappings for a spot
///
/// GET /api/v1/occupancy/spot/{spot_id}
#[instrument(skip(pool, cache))]
pub async fn list_occupancy_by_spot(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    debug!(spot_id, "Listing occupancy for spot");

    let mappings = vehicles(&pool, &cache).list_occupancy_by_spot(spot_id).await?;

    let responses: Vec<OccupancyResponse> =
        mappings.into_iter().map(OccupancyResponse::from).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(responses)))
}

/// Get the active occupancy mapping for a vehicle
///
/// GET /api/v1/occupancy/vehicle/{vehicle_id}
#[instrument(skip(pool, cache))]
pub async fn get_occupancy_by_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner();
    debug!(vehicle_id, "Getting occupancy for vehicle");

    let mapping = vehicles(&pool, &cache)
        .get_occupancy_by_vehicle(vehicle_id)
        .await?
        .ok_or_else(|| AppError::MappingNotFound(format!("vehicle {vehicle_id}")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(OccupancyResponse::from(mapping))))
}

/// Update an occupancy mapping
///
/// PUT /api/v1/occupancy
#[instrument(skip(pool, cache, req))]
pub async fn update_occupancy(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<OccupancyUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Occupancy update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(id = req.id, "Updating occupancy mapping");

    let updated = vehicles(&pool, &cache).update_occupancy(req.to_entity()).await?;

    info!(id = updated.lifecycle.id, "Occupancy mapping updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        OccupancyResponse::from(updated),
        "Occupancy mapping updated successfully",
    )))
}

/// Soft-delete an occupancy mapping
///
/// DELETE /api/v1/occupancy/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_occupancy(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let mapping_id = path.into_inner();
    debug!(id = mapping_id, "Deleting occupancy mapping");

    vehicles(&pool, &cache).delete_occupancy(mapping_id).await?;

    info!(id = mapping_id, "Occupancy mapping deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure occupancy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/occupancy")
            .route("", web::post().to(create_occupancy))
            .route("", web::put().to(update_occupancy))
            .route("/spot/{spot_id}", web::get().to(list_occupancy_by_spot))
            .route("/vehicle/{vehicle_id}", web::get().to(get_occupancy_by_vehicle))
            .route("/{id}", web::delete().to(delete_occupancy)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_create_conversion() {
        let req = OccupancyCreateRequest {
            vehicle_id: 4,
            spot_id: 9,
            user_id: 2,
        };
        assert!(req.validate().is_ok());

        let entity = req.to_entity();
        assert_eq!(entity.vehicle_id, 4);
        assert_eq!(entity.spot_id, 9);
        assert_eq!(entity.lifecycle.created_by, 2);
    }
}
