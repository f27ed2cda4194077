//! Vehicle model

use super::lifecycle::Lifecycle;
use super::spot::SizeClass;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A vehicle parked in, or settled out of, the lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// License plate as given at the gate
    pub license_plate: String,

    /// Size class used to route the vehicle to a spot
    pub size: SizeClass,

    /// Set once at admission, immutable thereafter
    pub entry_time: DateTime<Utc>,

    /// Set once at settlement
    pub exit_time: Option<DateTime<Utc>>,

    /// Zero until settlement computes the final fee
    pub total_fee: Decimal,
}

impl Vehicle {
    /// Name recorded in the audit trail for rows of this entity
    pub const ENTITY_NAME: &'static str = "Vehicle";

    pub fn new(license_plate: impl Into<String>, size: SizeClass, actor: i64) -> Self {
        Self {
            lifecycle: Lifecycle::new(actor),
            license_plate: license_plate.into(),
            size,
            entry_time: Utc::now(),
            exit_time: None,
            total_fee: Decimal::ZERO,
        }
    }

    /// Whole hours parked as of `exit_time`, rounded to the nearest hour.
    ///
    /// Ties round away from zero, so 30 minutes counts as a full hour.
    /// The result feeds the price-tier lookup, which works on whole hours.
    pub fn elapsed_hours(&self, exit_time: DateTime<Utc>) -> i64 {
        let millis = (exit_time - self.entry_time).num_milliseconds() as f64;
        (millis / 3_600_000.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vehicle_entered_at(entry: DateTime<Utc>) -> Vehicle {
        let mut v = Vehicle::new("34AB123", SizeClass::Small, 1);
        v.entry_time = entry;
        v
    }

    #[test]
    fn test_elapsed_hours_immediate_exit() {
        let entry = Utc::now();
        let v = vehicle_entered_at(entry);
        assert_eq!(v.elapsed_hours(entry), 0);
    }

    #[test]
    fn test_elapsed_hours_rounds_down_below_half() {
        let entry = Utc::now();
        let v = vehicle_entered_at(entry);
        assert_eq!(v.elapsed_hours(entry + Duration::minutes(29)), 0);
        assert_eq!(v.elapsed_hours(entry + Duration::minutes(89)), 1);
    }

    #[test]
    fn test_elapsed_hours_rounds_up_from_half() {
        let entry = Utc::now();
        let v = vehicle_entered_at(entry);
        assert_eq!(v.elapsed_hours(entry + Duration::minutes(30)), 1);
        assert_eq!(v.elapsed_hours(entry + Duration::minutes(90)), 2);
    }

    #[test]
    fn test_elapsed_hours_just_under_one_hour() {
        let entry = Utc::now();
        let v = vehicle_entered_at(entry);
        // 0.999 hours rounds to 1 before any tier lookup
        assert_eq!(v.elapsed_hours(entry + Duration::seconds(3596)), 1);
    }

    #[test]
    fn test_elapsed_hours_full_day() {
        let entry = Utc::now();
        let v = vehicle_entered_at(entry);
        assert_eq!(v.elapsed_hours(entry + Duration::hours(24)), 24);
    }

    #[test]
    fn test_new_vehicle_defaults() {
        let v = Vehicle::new("06XYZ42", SizeClass::Large, 3);
        assert!(v.lifecycle.is_current());
        assert_eq!(v.total_fee, Decimal::ZERO);
        assert!(v.exit_time.is_none());
    }
}
