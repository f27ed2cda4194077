//! Parking spot DTOs
//!
//! Request and response types for spot administration endpoints.

use chrono::{DateTime, Utc};
use parkflow_core::models::{ParkingSpot, SizeClass};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_user_id() -> i64 {
    1
}

/// Spot creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SpotCreateRequest {
    /// Unique spot name (e.g., "A1")
    #[validate(length(min = 1, max = 127, message = "Spot name is required"))]
    pub name: String,

    /// Size class of vehicles the spot accepts
    pub size: SizeClass,

    /// Number of vehicles the spot can hold at once
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_capacity: i32,

    /// Actor recorded as the creator
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl SpotCreateRequest {
    /// Convert to a ParkingSpot entity
    pub fn to_entity(&self) -> ParkingSpot {
        ParkingSpot::new(self.name.clone(), self.size, self.max_capacity, self.user_id)
    }
}

/// Spot update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SpotUpdateRequest {
    /// Id of the spot to update
    pub id: i64,

    /// New spot name
    #[validate(length(min = 1, max = 127, message = "Spot name is required"))]
    pub name: String,

    /// New size class
    pub size: SizeClass,

    /// New capacity
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_capacity: i32,

    /// Whether the spot participates in current state
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Actor recorded as the updater
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_is_active() -> bool {
    true
}

impl SpotUpdateRequest {
    /// Convert to a ParkingSpot entity carrying the target id.
    ///
    /// Only the updatable columns matter; creation metadata is preserved
    /// by the store and returned on the updated row.
    pub fn to_entity(&self) -> ParkingSpot {
        let mut spot = ParkingSpot::new(self.name.clone(), self.size, self.max_capacity, self.user_id);
        spot.lifecycle.id = self.id;
        spot.lifecycle.is_active = self.is_active;
        spot.lifecycle.mark_updated(self.user_id);
        spot
    }
}

/// Spot response
#[derive(Debug, Clone, Serialize)]
pub struct SpotResponse {
    /// Spot id
    pub id: i64,

    /// Spot name
    pub name: String,

    /// Size class
    pub size: SizeClass,

    /// Capacity
    pub max_capacity: i32,

    /// Whether the spot is active
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ParkingSpot> for SpotResponse {
    fn from(spot: ParkingSpot) -> Self {
        Self {
            id: spot.lifecycle.id,
            name: spot.name,
            size: spot.size,
            max_capacity: spot.max_capacity,
            is_active: spot.lifecycle.is_active,
            created_at: spot.lifecycle.created_at,
            updated_at: spot.lifecycle.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_create_request_to_entity() {
        let req = SpotCreateRequest {
            name: "A1".to_string(),
            size: SizeClass::Small,
            max_capacity: 4,
            user_id: 7,
        };

        let spot = req.to_entity();
        assert_eq!(spot.name, "A1");
        assert_eq!(spot.max_capacity, 4);
        assert_eq!(spot.lifecycle.created_by, 7);
        assert!(spot.lifecycle.is_current());
    }

    #[test]
    fn test_spot_create_request_validation() {
        let req = SpotCreateRequest {
            name: String::new(),
            size: SizeClass::Small,
            max_capacity: 0,
            user_id: 1,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_spot_update_request_carries_id_and_actor() {
        let req = SpotUpdateRequest {
            id: 12,
            name: "B2".to_string(),
            size: SizeClass::Large,
            max_capacity: 2,
            is_active: false,
            user_id: 9,
        };

        let spot = req.to_entity();
        assert_eq!(spot.lifecycle.id, 12);
        assert!(!spot.lifecycle.is_active);
        assert_eq!(spot.lifecycle.updated_by, Some(9));
    }

    #[test]
    fn test_spot_response_from_entity() {
        let mut spot = ParkingSpot::new("A1", SizeClass::Medium, 3, 1);
        spot.lifecycle.id = 5;

        let response = SpotResponse::from(spot);
        assert_eq!(response.id, 5);
        assert_eq!(response.size, SizeClass::Medium);
        assert!(response.is_active);
    }
}
