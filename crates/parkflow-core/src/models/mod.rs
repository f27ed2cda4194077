//! Domain models for Parkflow
//!
//! This module contains all the core domain models used throughout the application.

pub mod audit;
pub mod lifecycle;
pub mod occupancy;
pub mod spot;
pub mod tier;
pub mod vehicle;

pub use audit::{AuditEntry, AuditFilter, EntityState, LogEntry, LogLevel};
pub use lifecycle::{Lifecycle, SYSTEM_ACTOR_ID};
pub use occupancy::OccupancyMapping;
pub use spot::{ParkingSpot, SizeClass};
pub use tier::PriceTier;
pub use vehicle::Vehicle;
