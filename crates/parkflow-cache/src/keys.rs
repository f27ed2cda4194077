//! Cache key constants for Parkflow
//!
//! Each bulk collection is cached whole, as one JSON blob under one fixed
//! key. There is no per-entity keying; write paths invalidate the whole
//! collection and the next read repopulates it.
//!
//! # Keys
//!
//! - `spots:all` - Active parking spots
//! - `price_tiers:all` - Active price tiers
//! - `vehicles:all` - Active vehicles
//! - `occupancy:all` - Active occupancy mappings
//!
//! # Example
//!
//! ```
//! use parkflow_cache::keys;
//!
//! assert_eq!(keys::SPOTS_KEY, "spots:all");
//! assert_eq!(keys::DEFAULT_TTL_SECS, 3600);
//! ```

/// Bulk-cache key for the active parking spot collection
pub const SPOTS_KEY: &str = "spots:all";

/// Bulk-cache key for the active price tier collection
pub const TIERS_KEY: &str = "price_tiers:all";

/// Bulk-cache key for the active vehicle collection
pub const VEHICLES_KEY: &str = "vehicles:all";

/// Bulk-cache key for the active occupancy mapping collection
pub const OCCUPANCY_KEY: &str = "occupancy:all";

/// TTL applied to every cached collection (1 hour)
///
/// Bounds how stale a collection can get if an invalidation is ever
/// missed; coherence otherwise comes from invalidate-on-write.
pub const DEFAULT_TTL_SECS: u64 = 3600;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uniqueness() {
        let keys = [SPOTS_KEY, TIERS_KEY, VEHICLES_KEY, OCCUPANCY_KEY];

        let unique_count = keys.iter().collect::<std::collections::HashSet<_>>().len();
        assert_eq!(unique_count, keys.len());
    }

    #[test]
    fn test_key_values() {
        assert_eq!(SPOTS_KEY, "spots:all");
        assert_eq!(TIERS_KEY, "price_tiers:all");
        assert_eq!(VEHICLES_KEY, "vehicles:all");
        assert_eq!(OCCUPANCY_KEY, "occupancy:all");
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        assert_eq!(DEFAULT_TTL_SECS, 3600);
    }
}
