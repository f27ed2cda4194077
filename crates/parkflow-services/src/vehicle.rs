//! Vehicle and occupancy service
//!
//! Drives the two gate flows. Admission resolves a spot by size class,
//! checks capacity against live occupancy rows, and persists the vehicle
//! together with its occupancy mapping. Settlement computes elapsed hours,
//! prices them through the tier catalog, and closes both rows. Reads are
//! cache-aside over the full active collections.

use crate::cache_aside::{get_cached, invalidate, store_in_cache};
use crate::constants::{
    FEE_CALCULATED, LOT_FULL, NO_ACTIVE_OCCUPANCY, VEHICLE_ADDED, VEHICLE_NOT_FOUND,
};
use crate::snapshot;
use chrono::Utc;
use parkflow_cache::keys::{OCCUPANCY_KEY, VEHICLES_KEY};
use parkflow_core::{
    models::{AuditEntry, OccupancyMapping, Vehicle, SYSTEM_ACTOR_ID},
    traits::{
        AdmissionOutcome, AuditSink, CacheService, CatalogService, OccupancyRepository,
        SettlementOutcome, VehicleRepository,
    },
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Vehicle and occupancy service over the cached vehicle collections
pub struct VehicleService<V, M, C, K>
where
    V: VehicleRepository,
    M: OccupancyRepository,
    C: CacheService,
    K: CatalogService,
{
    vehicle_repo: Arc<V>,
    occupancy_repo: Arc<M>,
    cache: Arc<C>,
    catalog: Arc<K>,
    audit: Arc<dyn AuditSink>,
}

impl<V, M, C, K> VehicleService<V, M, C, K>
where
    V: VehicleRepository,
    M: OccupancyRepository,
    C: CacheService,
    K: CatalogService,
{
    /// Create a new vehicle service
    pub fn new(
        vehicle_repo: Arc<V>,
        occupancy_repo: Arc<M>,
        cache: Arc<C>,
        catalog: Arc<K>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            vehicle_repo,
            occupancy_repo,
            cache,
            catalog,
            audit,
        }
    }

    /// Cache-aside load of the active vehicle collection
    async fn load_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        if let Some(vehicles) = get_cached::<Vehicle, _>(self.cache.as_ref(), VEHICLES_KEY).await? {
            return Ok(vehicles
                .into_iter()
                .filter(|v| v.lifecycle.is_current())
                .collect());
        }

        debug!("Vehicle cache MISS, loading from repository");
        let vehicles = self.vehicle_repo.find_active().await?;
        store_in_cache(self.cache.as_ref(), VEHICLES_KEY, &vehicles).await?;

        Ok(vehicles)
    }

    /// Cache-aside load of the active occupancy collection
    async fn load_occupancy(&self) -> AppResult<Vec<OccupancyMapping>> {
        if let Some(mappings) =
            get_cached::<OccupancyMapping, _>(self.cache.as_ref(), OCCUPANCY_KEY).await?
        {
            return Ok(mappings
                .into_iter()
                .filter(|m| m.lifecycle.is_current())
                .collect());
        }

        debug!("Occupancy cache MISS, loading from repository");
        let mappings = self.occupancy_repo.find_active().await?;
        store_in_cache(self.cache.as_ref(), OCCUPANCY_KEY, &mappings).await?;

        Ok(mappings)
    }

    async fn record_audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.record_change(&entry).await {
            warn!("Failed to record audit entry: {}", e);
        }
    }

    /// Resolve an active vehicle by id
    #[instrument(skip(self))]
    pub async fn get_vehicle_by_id(&self, id: i64) -> AppResult<Vehicle> {
        let vehicles = self.load_vehicles().await?;

        vehicles
            .into_iter()
            .find(|v| v.lifecycle.id == id)
            .ok_or_else(|| AppError::VehicleNotFound(id.to_string()))
    }

    /// Resolve an active vehicle by license plate
    #[instrument(skip(self))]
    pub async fn get_vehicle_by_plate(&self, plate: &str) -> AppResult<Vehicle> {
        let vehicles = self.load_vehicles().await?;

        vehicles
            .into_iter()
            .find(|v| v.license_plate == plate)
            .ok_or_else(|| AppError::VehicleNotFound(plate.to_string()))
    }

    /// The vehicle's open occupancy mapping, if it has one
    #[instrument(skip(self))]
    pub async fn get_occupancy_by_vehicle(
        &self,
        vehicle_id: i64,
    ) -> AppResult<Option<OccupancyMapping>> {
        let mappings = self.load_occupancy().await?;

        Ok(mappings.into_iter().find(|m| m.vehicle_id == vehicle_id))
    }

    /// Open occupancy mappings of one spot, read straight from the store
    #[instrument(skip(self))]
    pub async fn list_occupancy_by_spot(&self, spot_id: i64) -> AppResult<Vec<OccupancyMapping>> {
        self.occupancy_repo.find_active_by_spot(spot_id).await
    }

    /// True when the spot's open mapping count has reached its capacity.
    ///
    /// Counts live rows, never the cache; admission must not overfill a
    /// spot because of a stale collection.
    #[instrument(skip(self))]
    pub async fn is_spot_full(&self, spot_id: i64, max_capacity: i32) -> AppResult<bool> {
        let occupied = self.list_occupancy_by_spot(spot_id).await?.len() as i32;
        Ok(occupied >= max_capacity)
    }

    /// Admit a vehicle into the lot.
    ///
    /// A full spot rejects the vehicle before anything is persisted. On
    /// acceptance the vehicle and its occupancy mapping are created
    /// together and both cached collections are invalidated.
    #[instrument(skip(self, vehicle), fields(license_plate = %vehicle.license_plate))]
    pub async fn create_vehicle(&self, mut vehicle: Vehicle) -> AppResult<AdmissionOutcome> {
        let spot = self.catalog.get_spot_by_size(vehicle.size).await?;

        if self.is_spot_full(spot.lifecycle.id, spot.max_capacity).await? {
            info!(
                "Spot {} is at capacity, rejecting vehicle {}",
                spot.name, vehicle.license_plate
            );
            return Ok(AdmissionOutcome::rejected(LOT_FULL));
        }

        // Admission invariants hold regardless of what the caller filled in.
        vehicle.entry_time = Utc::now();
        vehicle.exit_time = None;
        vehicle.total_fee = Decimal::ZERO;
        vehicle.lifecycle.is_active = true;

        let created = self.vehicle_repo.create(&vehicle).await?;

        let mapping = OccupancyMapping::new(
            created.lifecycle.id,
            spot.lifecycle.id,
            created.lifecycle.created_by,
        );
        let mapping = self.occupancy_repo.create(&mapping).await?;

        self.record_audit(AuditEntry::added(
            Vehicle::ENTITY_NAME,
            created.lifecycle.id,
            snapshot(&created),
        ))
        .await;
        self.record_audit(AuditEntry::added(
            OccupancyMapping::ENTITY_NAME,
            mapping.lifecycle.id,
            snapshot(&mapping),
        ))
        .await;

        futures::join!(
            invalidate(self.cache.as_ref(), VEHICLES_KEY),
            invalidate(self.cache.as_ref(), OCCUPANCY_KEY),
        );

        info!(
            "Vehicle {} admitted to spot {}",
            created.license_plate, spot.name
        );

        Ok(AdmissionOutcome::accepted(created, VEHICLE_ADDED))
    }

    /// Settle the parking fee for a vehicle resolved by id.
    ///
    /// An unknown or already-settled vehicle yields a rejected outcome,
    /// not an error; the first settlement closes the vehicle, so a second
    /// attempt no longer finds it among the active rows.
    #[instrument(skip(self))]
    pub async fn settle_by_vehicle_id(&self, id: i64) -> AppResult<SettlementOutcome> {
        let vehicles = self.load_vehicles().await?;

        match vehicles.into_iter().find(|v| v.lifecycle.id == id) {
            Some(vehicle) => self.settle(vehicle).await,
            None => Ok(SettlementOutcome::rejected(VEHICLE_NOT_FOUND)),
        }
    }

    /// Settle the parking fee for a vehicle resolved by license plate
    #[instrument(skip(self))]
    pub async fn settle_by_license_plate(&self, plate: &str) -> AppResult<SettlementOutcome> {
        let vehicles = self.load_vehicles().await?;

        match vehicles.into_iter().find(|v| v.license_plate == plate) {
            Some(vehicle) => self.settle(vehicle).await,
            None => Ok(SettlementOutcome::rejected(VEHICLE_NOT_FOUND)),
        }
    }

    /// Price the stay and close the vehicle together with its mapping.
    ///
    /// Without an open mapping the outcome reports a zero fee and nothing
    /// is written. A missing tier is a catalog misconfiguration and
    /// propagates as an error before any write happens.
    async fn settle(&self, mut vehicle: Vehicle) -> AppResult<SettlementOutcome> {
        let exit_time = Utc::now();
        let elapsed_hours = vehicle.elapsed_hours(exit_time);

        let mut mapping = match self.get_occupancy_by_vehicle(vehicle.lifecycle.id).await? {
            Some(mapping) => mapping,
            None => {
                info!(
                    "Vehicle {} has no open occupancy mapping",
                    vehicle.license_plate
                );
                return Ok(SettlementOutcome {
                    success: false,
                    message: Some(NO_ACTIVE_OCCUPANCY.to_string()),
                    price: Decimal::ZERO,
                    elapsed_hours,
                    entry_time: Some(vehicle.entry_time),
                    exit_time: Some(exit_time),
                });
            }
        };

        let tier = self
            .catalog
            .get_price_tier(mapping.spot_id, elapsed_hours)
            .await?;

        let old_vehicle = snapshot(&vehicle);
        let old_mapping = snapshot(&mapping);

        vehicle.exit_time = Some(exit_time);
        vehicle.total_fee = tier.price;
        vehicle.lifecycle.is_active = false;
        vehicle.lifecycle.mark_updated(SYSTEM_ACTOR_ID);
        let vehicle = self.vehicle_repo.update(&vehicle).await?;

        mapping.lifecycle.is_active = false;
        mapping.lifecycle.mark_updated(SYSTEM_ACTOR_ID);
        let mapping = self.occupancy_repo.update(&mapping).await?;

        self.record_audit(AuditEntry::modified(
            Vehicle::ENTITY_NAME,
            vehicle.lifecycle.id,
            old_vehicle,
            snapshot(&vehicle),
        ))
        .await;
        self.record_audit(AuditEntry::modified(
            OccupancyMapping::ENTITY_NAME,
            mapping.lifecycle.id,
            old_mapping,
            snapshot(&mapping),
        ))
        .await;

        futures::join!(
            invalidate(self.cache.as_ref(), VEHICLES_KEY),
            invalidate(self.cache.as_ref(), OCCUPANCY_KEY),
        );

        info!(
            "Vehicle {} settled after {} hours, fee {}",
            vehicle.license_plate, elapsed_hours, tier.price
        );

        Ok(SettlementOutcome {
            success: true,
            message: Some(FEE_CALCULATED.to_string()),
            price: tier.price,
            elapsed_hours,
            entry_time: Some(vehicle.entry_time),
            exit_time: Some(exit_time),
        })
    }

    /// Create an occupancy mapping directly; created rows are always open
    #[instrument(skip(self, mapping))]
    pub async fn create_occupancy(
        &self,
        mut mapping: OccupancyMapping,
    ) -> AppResult<OccupancyMapping> {
        mapping.lifecycle.is_active = true;

        let created = self.occupancy_repo.create(&mapping).await?;

        self.record_audit(AuditEntry::added(
            OccupancyMapping::ENTITY_NAME,
            created.lifecycle.id,
            snapshot(&created),
        ))
        .await;
        invalidate(self.cache.as_ref(), OCCUPANCY_KEY).await;

        Ok(created)
    }

    /// Update a vehicle
    #[instrument(skip(self, vehicle))]
    pub async fn update_vehicle(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let updated = self.vehicle_repo.update(&vehicle).await?;

        self.record_audit(AuditEntry::modified(
            Vehicle::ENTITY_NAME,
            updated.lifecycle.id,
            None,
            snapshot(&updated),
        ))
        .await;
        invalidate(self.cache.as_ref(), VEHICLES_KEY).await;

        Ok(updated)
    }

    /// Update an occupancy mapping
    #[instrument(skip(self, mapping))]
    pub async fn update_occupancy(
        &self,
        mapping: OccupancyMapping,
    ) -> AppResult<OccupancyMapping> {
        let updated = self.occupancy_repo.update(&mapping).await?;

        self.record_audit(AuditEntry::modified(
            OccupancyMapping::ENTITY_NAME,
            updated.lifecycle.id,
            None,
            snapshot(&updated),
        ))
        .await;
        invalidate(self.cache.as_ref(), OCCUPANCY_KEY).await;

        Ok(updated)
    }

    /// Soft-delete a vehicle
    #[instrument(skip(self))]
    pub async fn delete_vehicle(&self, id: i64) -> AppResult<()> {
        let deleted = self.vehicle_repo.delete(id).await?;
        if !deleted {
            return Err(AppError::VehicleNotFound(id.to_string()));
        }

        self.record_audit(AuditEntry::deleted(Vehicle::ENTITY_NAME, id))
            .await;
        invalidate(self.cache.as_ref(), VEHICLES_KEY).await;

        Ok(())
    }

    /// Soft-delete an occupancy mapping
    #[instrument(skip(self))]
    pub async fn delete_occupancy(&self, id: i64) -> AppResult<()> {
        let deleted = self.occupancy_repo.delete(id).await?;
        if !deleted {
            return Err(AppError::MappingNotFound(id.to_string()));
        }

        self.record_audit(AuditEntry::deleted(OccupancyMapping::ENTITY_NAME, id))
            .await;
        invalidate(self.cache.as_ref(), OCCUPANCY_KEY).await;

        Ok(())
    }
}
