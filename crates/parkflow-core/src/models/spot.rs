//! Parking spot model

use super::lifecycle::Lifecycle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle size class, shared by spots and vehicles.
///
/// A vehicle is routed to the first active spot of its own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    #[default]
    Small,
    Medium,
    Large,
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeClass::Small => write!(f, "small"),
            SizeClass::Medium => write!(f, "medium"),
            SizeClass::Large => write!(f, "large"),
        }
    }
}

impl SizeClass {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(SizeClass::Small),
            "medium" => Some(SizeClass::Medium),
            "large" => Some(SizeClass::Large),
            _ => None,
        }
    }
}

/// A parking location with a size class and a vehicle capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// Unique spot name, at most 127 characters
    pub name: String,

    /// Size class of vehicles this spot accepts
    pub size: SizeClass,

    /// Number of vehicles the spot can hold at once
    pub max_capacity: i32,
}

impl ParkingSpot {
    /// Name recorded in the audit trail for rows of this entity
    pub const ENTITY_NAME: &'static str = "ParkingSpot";

    pub fn new(name: impl Into<String>, size: SizeClass, max_capacity: i32, actor: i64) -> Self {
        Self {
            lifecycle: Lifecycle::new(actor),
            name: name.into(),
            size,
            max_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_display() {
        assert_eq!(SizeClass::Small.to_string(), "small");
        assert_eq!(SizeClass::Medium.to_string(), "medium");
        assert_eq!(SizeClass::Large.to_string(), "large");
    }

    #[test]
    fn test_size_class_from_str() {
        assert_eq!(SizeClass::from_str("small"), Some(SizeClass::Small));
        assert_eq!(SizeClass::from_str("MEDIUM"), Some(SizeClass::Medium));
        assert_eq!(SizeClass::from_str("Large"), Some(SizeClass::Large));
        assert_eq!(SizeClass::from_str("xl"), None);
    }

    #[test]
    fn test_new_spot_is_current() {
        let spot = ParkingSpot::new("A1", SizeClass::Small, 4, 1);
        assert!(spot.lifecycle.is_current());
        assert_eq!(spot.name, "A1");
        assert_eq!(spot.max_capacity, 4);
    }

    #[test]
    fn test_size_class_serde_lowercase() {
        let json = serde_json::to_string(&SizeClass::Medium).unwrap();
        assert_eq!(json, "\"medium\"");

        let parsed: SizeClass = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(parsed, SizeClass::Large);
    }
}
