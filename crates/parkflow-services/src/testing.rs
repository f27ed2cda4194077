//! Shared test doubles for the service tests
//!
//! In-memory stand-ins for the cache, the repositories, the audit sink,
//! and the catalog seam; none of them require Redis or PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use parkflow_core::{
    models::{AuditEntry, LogLevel, OccupancyMapping, ParkingSpot, PriceTier, SizeClass, Vehicle},
    traits::{
        AuditSink, CacheService, CatalogService, OccupancyRepository, Repository, SpotRepository,
        TierRepository, VehicleRepository,
    },
    AppError, AppResult,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Cache backed by a plain HashMap of JSON strings
#[derive(Default)]
pub struct InMemoryCache {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Seed a raw JSON blob, bypassing the set path
    pub fn insert_raw(&self, key: &str, json: &str) {
        self.data.lock().insert(key.to_string(), json.to_string());
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.data.lock().get(key) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| AppError::Cache(e.to_string())),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        _ttl_secs: u64,
    ) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| AppError::Cache(e.to_string()))?;
        self.data.lock().insert(key.to_string(), raw);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.data.lock().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.data.lock().contains_key(key))
    }

    async fn clear(&self) -> AppResult<()> {
        self.data.lock().clear();
        Ok(())
    }
}

/// Cache whose every operation fails, for degraded-mode tests
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get<T: DeserializeOwned>(&self, _key: &str) -> AppResult<Option<T>> {
        Err(AppError::CacheConnection("cache offline".to_string()))
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        _key: &str,
        _value: &T,
        _ttl_secs: u64,
    ) -> AppResult<()> {
        Err(AppError::CacheConnection("cache offline".to_string()))
    }

    async fn delete(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::CacheConnection("cache offline".to_string()))
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::CacheConnection("cache offline".to_string()))
    }

    async fn clear(&self) -> AppResult<()> {
        Err(AppError::CacheConnection("cache offline".to_string()))
    }
}

/// Audit sink that records everything it is handed
#[derive(Default)]
pub struct RecordingAuditSink {
    pub entries: Mutex<Vec<AuditEntry>>,
    pub logs: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingAuditSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries_for(&self, table_name: &str) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.table_name == table_name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record_change(&self, entry: &AuditEntry) -> AppResult<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    async fn append_log(
        &self,
        level: LogLevel,
        short_message: &str,
        _full_message: &str,
    ) -> AppResult<()> {
        self.logs.lock().push((level, short_message.to_string()));
        Ok(())
    }
}

/// In-memory spot repository with a call counter on the bulk read
#[derive(Default)]
pub struct MockSpotRepository {
    pub spots: Mutex<Vec<ParkingSpot>>,
    pub find_active_calls: AtomicUsize,
    next_id: AtomicI64,
}

impl MockSpotRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        })
    }

    pub fn with_spots(spots: Vec<ParkingSpot>) -> Arc<Self> {
        let max_id = spots.iter().map(|s| s.lifecycle.id).max().unwrap_or(0);
        Arc::new(Self {
            spots: Mutex::new(spots),
            find_active_calls: AtomicUsize::new(0),
            next_id: AtomicI64::new(max_id + 1),
        })
    }
}

#[async_trait]
impl Repository<ParkingSpot, i64> for MockSpotRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingSpot>> {
        Ok(self
            .spots
            .lock()
            .iter()
            .find(|s| s.lifecycle.id == id && !s.lifecycle.is_deleted)
            .cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<ParkingSpot>> {
        Ok(self
            .spots
            .lock()
            .iter()
            .filter(|s| !s.lifecycle.is_deleted)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self
            .spots
            .lock()
            .iter()
            .filter(|s| !s.lifecycle.is_deleted)
            .count() as i64)
    }

    async fn create(&self, entity: &ParkingSpot) -> AppResult<ParkingSpot> {
        let mut stored = entity.clone();
        stored.lifecycle.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.spots.lock().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &ParkingSpot) -> AppResult<ParkingSpot> {
        let mut spots = self.spots.lock();
        match spots
            .iter_mut()
            .find(|s| s.lifecycle.id == entity.lifecycle.id && !s.lifecycle.is_deleted)
        {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::SpotNotFound(entity.lifecycle.id.to_string())),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut spots = self.spots.lock();
        match spots
            .iter_mut()
            .find(|s| s.lifecycle.id == id && !s.lifecycle.is_deleted)
        {
            Some(slot) => {
                slot.lifecycle.is_active = false;
                slot.lifecycle.is_deleted = true;
                slot.lifecycle.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SpotRepository for MockSpotRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<ParkingSpot>> {
        Ok(self
            .spots
            .lock()
            .iter()
            .find(|s| s.name == name && !s.lifecycle.is_deleted)
            .cloned())
    }

    async fn find_active(&self) -> AppResult<Vec<ParkingSpot>> {
        self.find_active_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .spots
            .lock()
            .iter()
            .filter(|s| s.lifecycle.is_current())
            .cloned()
            .collect())
    }
}

/// In-memory price tier repository with a call counter on the bulk read
#[derive(Default)]
pub struct MockTierRepository {
    pub tiers: Mutex<Vec<PriceTier>>,
    pub find_active_calls: AtomicUsize,
    next_id: AtomicI64,
}

impl MockTierRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        })
    }

    pub fn with_tiers(tiers: Vec<PriceTier>) -> Arc<Self> {
        let max_id = tiers.iter().map(|t| t.lifecycle.id).max().unwrap_or(0);
        Arc::new(Self {
            tiers: Mutex::new(tiers),
            find_active_calls: AtomicUsize::new(0),
            next_id: AtomicI64::new(max_id + 1),
        })
    }
}

#[async_trait]
impl Repository<PriceTier, i64> for MockTierRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<PriceTier>> {
        Ok(self
            .tiers
            .lock()
            .iter()
            .find(|t| t.lifecycle.id == id && !t.lifecycle.is_deleted)
            .cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<PriceTier>> {
        Ok(self
            .tiers
            .lock()
            .iter()
            .filter(|t| !t.lifecycle.is_deleted)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self
            .tiers
            .lock()
            .iter()
            .filter(|t| !t.lifecycle.is_deleted)
            .count() as i64)
    }

    async fn create(&self, entity: &PriceTier) -> AppResult<PriceTier> {
        let mut stored = entity.clone();
        stored.lifecycle.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tiers.lock().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &PriceTier) -> AppResult<PriceTier> {
        let mut tiers = self.tiers.lock();
        match tiers
            .iter_mut()
            .find(|t| t.lifecycle.id == entity.lifecycle.id && !t.lifecycle.is_deleted)
        {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::TierNotFound(entity.lifecycle.id.to_string())),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tiers = self.tiers.lock();
        match tiers
            .iter_mut()
            .find(|t| t.lifecycle.id == id && !t.lifecycle.is_deleted)
        {
            Some(slot) => {
                slot.lifecycle.is_active = false;
                slot.lifecycle.is_deleted = true;
                slot.lifecycle.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TierRepository for MockTierRepository {
    async fn find_active(&self) -> AppResult<Vec<PriceTier>> {
        self.find_active_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tiers
            .lock()
            .iter()
            .filter(|t| t.lifecycle.is_current())
            .cloned()
            .collect())
    }
}

/// In-memory vehicle repository with a call counter on the bulk read
#[derive(Default)]
pub struct MockVehicleRepository {
    pub vehicles: Mutex<Vec<Vehicle>>,
    pub find_active_calls: AtomicUsize,
    next_id: AtomicI64,
}

impl MockVehicleRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        })
    }

    pub fn stored(&self, id: i64) -> Option<Vehicle> {
        self.vehicles
            .lock()
            .iter()
            .find(|v| v.lifecycle.id == id)
            .cloned()
    }
}

#[async_trait]
impl Repository<Vehicle, i64> for MockVehicleRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .iter()
            .find(|v| v.lifecycle.id == id && !v.lifecycle.is_deleted)
            .cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .iter()
            .filter(|v| !v.lifecycle.is_deleted)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self
            .vehicles
            .lock()
            .iter()
            .filter(|v| !v.lifecycle.is_deleted)
            .count() as i64)
    }

    async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        let mut stored = entity.clone();
        stored.lifecycle.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.vehicles.lock().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.lock();
        match vehicles
            .iter_mut()
            .find(|v| v.lifecycle.id == entity.lifecycle.id && !v.lifecycle.is_deleted)
        {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::VehicleNotFound(entity.lifecycle.id.to_string())),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut vehicles = self.vehicles.lock();
        match vehicles
            .iter_mut()
            .find(|v| v.lifecycle.id == id && !v.lifecycle.is_deleted)
        {
            Some(slot) => {
                slot.lifecycle.is_active = false;
                slot.lifecycle.is_deleted = true;
                slot.lifecycle.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl VehicleRepository for MockVehicleRepository {
    async fn find_active(&self) -> AppResult<Vec<Vehicle>> {
        self.find_active_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vehicles
            .lock()
            .iter()
            .filter(|v| v.lifecycle.is_current())
            .cloned()
            .collect())
    }
}

/// In-memory occupancy mapping repository
#[derive(Default)]
pub struct MockOccupancyRepository {
    pub mappings: Mutex<Vec<OccupancyMapping>>,
    pub find_active_calls: AtomicUsize,
    next_id: AtomicI64,
}

impl MockOccupancyRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        })
    }

    pub fn stored(&self, id: i64) -> Option<OccupancyMapping> {
        self.mappings
            .lock()
            .iter()
            .find(|m| m.lifecycle.id == id)
            .cloned()
    }
}

#[async_trait]
impl Repository<OccupancyMapping, i64> for MockOccupancyRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<OccupancyMapping>> {
        Ok(self
            .mappings
            .lock()
            .iter()
            .find(|m| m.lifecycle.id == id && !m.lifecycle.is_deleted)
            .cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<OccupancyMapping>> {
        Ok(self
            .mappings
            .lock()
            .iter()
            .filter(|m| !m.lifecycle.is_deleted)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self
            .mappings
            .lock()
            .iter()
            .filter(|m| !m.lifecycle.is_deleted)
            .count() as i64)
    }

    async fn create(&self, entity: &OccupancyMapping) -> AppResult<OccupancyMapping> {
        let mut stored = entity.clone();
        stored.lifecycle.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.mappings.lock().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &OccupancyMapping) -> AppResult<OccupancyMapping> {
        let mut mappings = self.mappings.lock();
        match mappings
            .iter_mut()
            .find(|m| m.lifecycle.id == entity.lifecycle.id && !m.lifecycle.is_deleted)
        {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::MappingNotFound(entity.lifecycle.id.to_string())),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut mappings = self.mappings.lock();
        match mappings
            .iter_mut()
            .find(|m| m.lifecycle.id == id && !m.lifecycle.is_deleted)
        {
            Some(slot) => {
                slot.lifecycle.is_active = false;
                slot.lifecycle.is_deleted = true;
                slot.lifecycle.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OccupancyRepository for MockOccupancyRepository {
    async fn find_active(&self) -> AppResult<Vec<OccupancyMapping>> {
        self.find_active_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .mappings
            .lock()
            .iter()
            .filter(|m| m.lifecycle.is_current())
            .cloned()
            .collect())
    }

    async fn find_active_by_spot(&self, spot_id: i64) -> AppResult<Vec<OccupancyMapping>> {
        Ok(self
            .mappings
            .lock()
            .iter()
            .filter(|m| m.spot_id == spot_id && m.lifecycle.is_current())
            .cloned()
            .collect())
    }
}

/// Fixed catalog seam for vehicle flow tests
pub struct MockCatalog {
    pub spots: Vec<ParkingSpot>,
    pub tiers: Vec<PriceTier>,
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn get_spot_by_size(&self, size: SizeClass) -> AppResult<ParkingSpot> {
        self.spots
            .iter()
            .find(|s| s.size == size && s.lifecycle.is_current())
            .cloned()
            .ok_or_else(|| AppError::SpotNotFound(size.to_string()))
    }

    async fn get_price_tier(&self, spot_id: i64, elapsed_hours: i64) -> AppResult<PriceTier> {
        self.tiers
            .iter()
            .find(|t| t.spot_id == spot_id && t.lifecycle.is_current() && t.covers(elapsed_hours))
            .cloned()
            .ok_or_else(|| {
                AppError::TierNotFound(format!("spot {} at {} hours", spot_id, elapsed_hours))
            })
    }
}

/// Build a spot with a fixed id, as if already persisted
pub fn persisted_spot(id: i64, name: &str, size: SizeClass, max_capacity: i32) -> ParkingSpot {
    let mut spot = ParkingSpot::new(name, size, max_capacity, 1);
    spot.lifecycle.id = id;
    spot
}

/// Build a tier with a fixed id, as if already persisted
pub fn persisted_tier(
    id: i64,
    spot_id: i64,
    price: rust_decimal::Decimal,
    min_hours: i32,
    max_hours: i32,
) -> PriceTier {
    let mut tier = PriceTier::new(spot_id, price, min_hours, max_hours, 1);
    tier.lifecycle.id = id;
    tier
}

/// Build a vehicle with a fixed id, as if already persisted
pub fn persisted_vehicle(id: i64, license_plate: &str, size: SizeClass) -> Vehicle {
    let mut vehicle = Vehicle::new(license_plate, size, 1);
    vehicle.lifecycle.id = id;
    vehicle
}

/// Build an occupancy mapping with a fixed id, as if already persisted
pub fn persisted_mapping(id: i64, vehicle_id: i64, spot_id: i64) -> OccupancyMapping {
    let mut mapping = OccupancyMapping::new(vehicle_id, spot_id, 1);
    mapping.lifecycle.id = id;
    mapping
}
