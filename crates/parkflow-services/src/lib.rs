//! Business logic services for Parkflow
//!
//! This crate contains the business logic that orchestrates parking
//! operations: the spot/tier catalog, vehicle admission, occupancy
//! tracking, and fee settlement at exit.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service receives its dependencies (repositories, cache, audit
//!   sink) through its constructor and shares them via Arc
//! - The cache is an expendable copy of the store; every read falls back
//!   to the repository when the cache is empty or unreachable
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `CatalogServiceImpl` - Spot and price tier CRUD with cached bulk reads
//! - `VehicleService` - Vehicle admission, occupancy tracking, and fee settlement

mod cache_aside;
pub mod catalog;
pub mod vehicle;

pub use catalog::CatalogServiceImpl;
pub use vehicle::VehicleService;

#[cfg(test)]
pub(crate) mod testing;

/// Outcome messages returned to callers alongside success flags
pub mod constants {
    /// Admission accepted
    pub const VEHICLE_ADDED: &str = "Vehicle added";

    /// Admission rejected: the candidate spot is at capacity
    pub const LOT_FULL: &str =
        "No suitable parking spot found for the vehicle. Parking lot is at full capacity";

    /// Settlement rejected: no active vehicle matched the id or plate
    pub const VEHICLE_NOT_FOUND: &str = "Vehicle not found.";

    /// Settlement skipped: the vehicle has no active occupancy mapping
    pub const NO_ACTIVE_OCCUPANCY: &str = "No active occupancy mapping for the vehicle.";

    /// Settlement completed
    pub const FEE_CALCULATED: &str = "Parking fee calculated.";
}

/// Serialize an entity for an audit snapshot; serialization problems
/// degrade to no snapshot rather than failing the operation.
pub(crate) fn snapshot<T: serde::Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}
