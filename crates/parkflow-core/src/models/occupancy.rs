//! Occupancy mapping model

use super::lifecycle::Lifecycle;
use serde::{Deserialize, Serialize};

/// The record linking a vehicle to the spot it currently or most recently
/// occupied. One row per parking event; settlement clears the active flag
/// but keeps the row as occupancy history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyMapping {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// Parked vehicle
    pub vehicle_id: i64,

    /// Occupied spot
    pub spot_id: i64,
}

impl OccupancyMapping {
    /// Name recorded in the audit trail for rows of this entity
    pub const ENTITY_NAME: &'static str = "OccupancyMapping";

    pub fn new(vehicle_id: i64, spot_id: i64, actor: i64) -> Self {
        Self {
            lifecycle: Lifecycle::new(actor),
            vehicle_id,
            spot_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mapping_is_active() {
        let mapping = OccupancyMapping::new(10, 3, 1);
        assert!(mapping.lifecycle.is_current());
        assert_eq!(mapping.vehicle_id, 10);
        assert_eq!(mapping.spot_id, 3);
    }
}
