//! Price tier model

use super::lifecycle::Lifecycle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price rule for one spot over an elapsed-time range.
///
/// Bounds are whole hours, inclusive on both ends. Nothing prevents two
/// active tiers of the same spot from overlapping; lookups take the first
/// match in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTier {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// Spot this tier prices
    pub spot_id: i64,

    /// Flat price charged when the tier matches
    pub price: Decimal,

    /// Lower bound in hours, inclusive
    pub min_hours: i32,

    /// Upper bound in hours, inclusive
    pub max_hours: i32,
}

impl PriceTier {
    /// Name recorded in the audit trail for rows of this entity
    pub const ENTITY_NAME: &'static str = "PriceTier";

    pub fn new(spot_id: i64, price: Decimal, min_hours: i32, max_hours: i32, actor: i64) -> Self {
        Self {
            lifecycle: Lifecycle::new(actor),
            spot_id,
            price,
            min_hours,
            max_hours,
        }
    }

    /// True when the elapsed hours fall within this tier, bounds included
    pub fn covers(&self, elapsed_hours: i64) -> bool {
        elapsed_hours >= i64::from(self.min_hours) && elapsed_hours <= i64::from(self.max_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_covers_is_inclusive_on_both_ends() {
        let tier = PriceTier::new(1, dec!(10.00), 1, 2, 1);

        assert!(!tier.covers(0));
        assert!(tier.covers(1));
        assert!(tier.covers(2));
        assert!(!tier.covers(3));
    }

    #[test]
    fn test_covers_zero_hour_tier() {
        let tier = PriceTier::new(1, dec!(5.00), 0, 24, 1);

        assert!(tier.covers(0));
        assert!(tier.covers(24));
        assert!(!tier.covers(25));
    }

    #[test]
    fn test_covers_negative_elapsed() {
        let tier = PriceTier::new(1, dec!(5.00), 0, 24, 1);
        assert!(!tier.covers(-1));
    }
}
