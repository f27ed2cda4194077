//! Common traits for repositories and services
//!
//! Defines abstractions for database access, caching, and business logic.

use crate::error::AppError;
use crate::models::{
    AuditEntry, AuditFilter, LogLevel, OccupancyMapping, ParkingSpot, PriceTier, SizeClass, Vehicle,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Soft-delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Parking spot repository trait with specialized methods
#[async_trait]
pub trait SpotRepository: Repository<ParkingSpot, i64> {
    /// Find spot by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<ParkingSpot>, AppError>;

    /// Load the full active, non-deleted collection in insertion order
    async fn find_active(&self) -> Result<Vec<ParkingSpot>, AppError>;
}

/// Price tier repository trait with specialized methods
#[async_trait]
pub trait TierRepository: Repository<PriceTier, i64> {
    /// Load the full active, non-deleted collection in insertion order
    async fn find_active(&self) -> Result<Vec<PriceTier>, AppError>;
}

/// Vehicle repository trait with specialized methods
#[async_trait]
pub trait VehicleRepository: Repository<Vehicle, i64> {
    /// Load the full active, non-deleted collection in insertion order
    async fn find_active(&self) -> Result<Vec<Vehicle>, AppError>;
}

/// Occupancy mapping repository trait with specialized methods
#[async_trait]
pub trait OccupancyRepository: Repository<OccupancyMapping, i64> {
    /// Load the full active, non-deleted collection in insertion order
    async fn find_active(&self) -> Result<Vec<OccupancyMapping>, AppError>;

    /// Active mappings for one spot, straight from the store.
    ///
    /// Capacity decisions read through this, never through the cache.
    async fn find_active_by_spot(&self, spot_id: i64) -> Result<Vec<OccupancyMapping>, AppError>;
}

/// Audit trail query trait
#[async_trait]
pub trait AuditQuery: Send + Sync {
    /// List audit entries matching the filter, newest first, with total count
    async fn find_filtered(
        &self,
        filter: &AuditFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AuditEntry>, i64), AppError>;
}

/// Append-only sink for audit entries and application logs.
///
/// Callers treat both methods as fire-and-forget; a failed append is
/// logged and swallowed so it never breaks the main request flow.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an entity change
    async fn record_change(&self, entry: &AuditEntry) -> Result<(), AppError>;

    /// Append an application log entry
    async fn append_log(
        &self,
        level: LogLevel,
        short_message: &str,
        full_message: &str,
    ) -> Result<(), AppError>;
}

/// Catalog service trait
///
/// The seam the vehicle workflow depends on: spot routing by size class
/// and price-tier resolution by elapsed hours.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// First active spot matching the size class, in insertion order
    async fn get_spot_by_size(&self, size: SizeClass) -> Result<ParkingSpot, AppError>;

    /// Tier covering the elapsed hours for a spot; NotFound when no tier matches
    async fn get_price_tier(&self, spot_id: i64, elapsed_hours: i64)
        -> Result<PriceTier, AppError>;
}

/// Outcome of a vehicle admission attempt.
///
/// A full lot is a normal business outcome, not an error; callers must
/// branch on `success` rather than on an error type.
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub vehicle: Option<Vehicle>,
}

impl AdmissionOutcome {
    pub fn accepted(vehicle: Vehicle, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            vehicle: Some(vehicle),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            vehicle: None,
        }
    }
}

/// Outcome of a fee settlement
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub price: Decimal,
    pub elapsed_hours: i64,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
}

impl SettlementOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            price: Decimal::ZERO,
            elapsed_hours: 0,
            entry_time: None,
            exit_time: None,
        }
    }
}

/// Cache service trait
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get value from cache
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Set value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Delete value from cache
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Drop every key in the cache
    async fn clear(&self) -> Result<(), AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
