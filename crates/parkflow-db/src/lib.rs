//! Parkflow Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the Parkflow system. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for all domain entities
//! - A soft-delete global filter applied by every default query
//! - The append-only audit and log store

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use parkflow_core::{AppError, AppResult};
pub use sqlx::PgPool;
