//! Vehicle handlers
//!
//! HTTP handlers for admission, settlement, and vehicle administration.
//! Admission and settlement return business outcomes with a success flag;
//! callers branch on the flag, not on the HTTP status.

use crate::dto::vehicle::{
    AdmissionResponse, SettlementResponse, VehicleCreateRequest, VehicleResponse,
    VehicleUpdateRequest,
};
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

/// Admit a vehicle into the lot
///
/// POST /api/v1/vehicles
#[instrument(skip(pool, cache, req))]
pub async fn create_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<VehicleCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Vehicle admission validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(plate = %req.license_plate, size = %req.size, "Admitting vehicle");

    let outcome = vehicles(&pool, &cache).create_vehicle(req.to_entity()).await?;

    info!(
        plate = %req.license_plate,
        success = outcome.success,
        "Vehicle admission processed"
    );

    Ok(HttpResponse::Ok().json(AdmissionResponse::from(outcome)))
}

/// Get a single vehicle by id
///
/// GET /api/v1/vehicles/{id}
#[instrument(skip(pool, cache))]
pub async fn get_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner();
    debug!(id = vehicle_id, "Getting vehicle");

    let vehicle = vehicles(&pool, &cache).get_vehicle_by_id(vehicle_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

/// Get a single vehicle by license plate
///
/// GET /api/v1/vehicles/plate/{plate}
#[instrument(skip(pool, cache))]
pub async fn get_vehicle_by_plate(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plate = path.into_inner();
    debug!(%plate, "Getting vehicle by plate");

    let vehicle = vehicles(&pool, &cache).get_vehicle_by_plate(&plate).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

/// Settle the parking fee for a vehicle by id
///
/// POST /api/v1/vehicles/{id}/fee
#[instrument(skip(pool, cache))]
pub async fn settle_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner();
    debug!(id = vehicle_id, "Settling parking fee");

    let outcome = vehicles(&pool, &cache).settle_by_vehicle_id(vehicle_id).await?;

    info!(
        id = vehicle_id,
        success = outcome.success,
        price = %outcome.price,
        "Settlement processed"
    );

    Ok(HttpResponse::Ok().json(SettlementResponse::from(outcome)))
}

/// Settle the parking fee for a vehicle by license plate
///
/// POST /api/v1/vehicles/plate/{plate}/fee
#[instrument(skip(pool, cache))]
pub async fn settle_vehicle_by_plate(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plate = path.into_inner();
    debug!(%plate, "Settling parking fee by plate");

    let outcome = vehicles(&pool, &cache).settle_by_license_plate(&plate).await?;

    info!(
        %plate,
        success = outcome.success,
        price = %outcome.price,
        "Settlement processed"
    );

    Ok(HttpResponse::Ok().json(SettlementResponse::from(outcome)))
}

/// Update a vehicle
///
/// PUT /api/v1/vehicles
#[instrument(skip(pool, cache, req))]
pub async fn update_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<VehicleUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Vehicle update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(id = req.id, "Updating vehicle");

    let updated = vehicles(&pool, &cache).update_vehicle(req.to_entity()).await?;

    info!(id = updated.lifecycle.id, "Vehicle updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        VehicleResponse::from(updated),
        "Vehicle updated successfully",
    )))
}

/// Soft-delete a vehicle
///
/// DELETE /api/v1/vehicles/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_vehicle(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner();
    debug!(id = vehicle_id, "Deleting vehicle");

    vehicles(&pool, &cache).delete_vehicle(vehicle_id).await?;

    info!(id = vehicle_id, "Vehicle deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure vehicle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::post().to(create_vehicle))
            .route("", web::put().to(update_vehicle))
            .route("/plate/{plate}/fee", web::post().to(settle_vehicle_by_plate))
            .route("/plate/{plate}", web::get().to(get_vehicle_by_plate))
            .route("/{id}/fee", web::post().to(settle_vehicle))
            .route("/{id}", web::get().to(get_vehicle))
            .route("/{id}", web::delete().to(delete_vehicle)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkflow_core::models::SizeClass;

    #[test]
    fn test_vehicle_create_validation() {
        let valid = VehicleCreateRequest {
            license_plate: "34AB123".to_string(),
            size: SizeClass::Small,
            user_id: 1,
        };
        assert!(valid.validate().is_ok());

        let invalid = VehicleCreateRequest {
            license_plate: String::new(),
            size: SizeClass::Small,
            user_id: 1,
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_vehicle_update_validation() {
        let invalid = VehicleUpdateRequest {
            id: 1,
            license_plate: "x".repeat(40),
            size: SizeClass::Small,
            is_active: true,
            user_id: 1,
        };
        assert!(invalid.validate().is_err());
    }
}
