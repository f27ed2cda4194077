//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in parkflow-core, using sqlx for PostgreSQL access.

pub mod audit_store;
pub mod occupancy_repo;
pub mod spot_repo;
pub mod tier_repo;
pub mod vehicle_repo;

pub use audit_store::PgAuditStore;
pub use occupancy_repo::PgOccupancyRepository;
pub use spot_repo::PgSpotRepository;
pub use tier_repo::PgTierRepository;
pub use vehicle_repo::PgVehicleRepository;
