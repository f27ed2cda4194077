//! API layer for Parkflow
//!
//! HTTP handlers and DTOs for the parking lot management endpoints:
//! spot and price tier administration, vehicle admission and fee
//! settlement, occupancy mappings, and the audit trail.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_audits, configure_occupancy, configure_spots, configure_tiers, configure_vehicles,
};
