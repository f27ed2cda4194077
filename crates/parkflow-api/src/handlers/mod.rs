//! HTTP request handlers

pub mod audit;
pub mod occupancy;
pub mod spot;
pub mod tier;
pub mod vehicle;

pub use audit::configure as configure_audits;
pub use occupancy::configure as configure_occupancy;
pub use spot::configure as configure_spots;
pub use tier::configure as configure_tiers;
pub use vehicle::configure as configure_vehicles;
