//! Data Transfer Objects (DTOs) for API requests and responses

pub mod audit;
pub mod common;
pub mod occupancy;
pub mod spot;
pub mod tier;
pub mod vehicle;

pub use audit::*;
pub use common::*;
pub use occupancy::*;
pub use spot::*;
pub use tier::*;
pub use vehicle::*;
