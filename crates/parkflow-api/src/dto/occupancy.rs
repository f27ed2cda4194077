//! Occupancy mapping DTOs

use chrono::{DateTime, Utc};
use parkflow_core::models::OccupancyMapping;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_user_id() -> i64 {
    1
}

/// Occupancy mapping creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OccupancyCreateRequest {
    /// Vehicle occupying the spot
    pub vehicle_id: i64,

    /// Occupied spot
    pub spot_id: i64,

    /// Actor recorded as the creator
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl OccupancyCreateRequest {
    /// Convert to an OccupancyMapping entity
    pub fn to_entity(&self) -> OccupancyMapping {
        OccupancyMapping::new(self.vehicle_id, self.spot_id, self.user_id)
    }
}

/// Occupancy mapping update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OccupancyUpdateRequest {
    /// Id of the mapping to update
    pub id: i64,

    /// Vehicle occupying the spot
    pub vehicle_id: i64,

    /// Occupied spot
    pub spot_id: i64,

    /// Whether the mapping is still open
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Actor recorded as the updater
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_is_active() -> bool {
    true
}

impl OccupancyUpdateRequest {
    /// Convert to an OccupancyMapping entity carrying the target id
    pub fn to_entity(&self) -> OccupancyMapping {
        let mut mapping = OccupancyMapping::new(self.vehicle_id, self.spot_id, self.user_id);
        mapping.lifecycle.id = self.id;
        mapping.lifecycle.is_active = self.is_active;
        mapping.lifecycle.mark_updated(self.user_id);
        mapping
    }
}

/// Occupancy mapping response
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyResponse {
    /// Mapping id
    pub id: i64,

    /// Vehicle occupying the spot
    pub vehicle_id: i64,

    /// Occupied spot
    pub spot_id: i64,

    /// Whether the mapping is still open
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<OccupancyMapping> for OccupancyResponse {
    fn from(mapping: OccupancyMapping) -> Self {
        Self {
            id: mapping.lifecycle.id,
            vehicle_id: mapping.vehicle_id,
            spot_id: mapping.spot_id,
            is_active: mapping.lifecycle.is_active,
            created_at: mapping.lifecycle.created_at,
            updated_at: mapping.lifecycle.updated_at,
        }
    }
}
