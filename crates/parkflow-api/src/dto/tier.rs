//! Price tier DTOs
//!
//! Request and response types for price tier administration endpoints.

use chrono::{DateTime, Utc};
use parkflow_core::models::PriceTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_user_id() -> i64 {
    1
}

/// Price tier creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TierCreateRequest {
    /// Spot the tier prices
    pub spot_id: i64,

    /// Fee charged when the elapsed hours fall in this tier
    pub price: Decimal,

    /// Lower bound of the covered range, inclusive
    #[validate(range(min = 0, message = "Hours cannot be negative"))]
    pub min_hours: i32,

    /// Upper bound of the covered range, inclusive
    #[validate(range(min = 0, message = "Hours cannot be negative"))]
    pub max_hours: i32,

    /// Actor recorded as the creator
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl TierCreateRequest {
    /// Convert to a PriceTier entity
    pub fn to_entity(&self) -> PriceTier {
        PriceTier::new(
            self.spot_id,
            self.price,
            self.min_hours,
            self.max_hours,
            self.user_id,
        )
    }
}

/// Price tier update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TierUpdateRequest {
    /// Id of the tier to update
    pub id: i64,

    /// Spot the tier prices
    pub spot_id: i64,

    /// New fee
    pub price: Decimal,

    /// New lower bound, inclusive
    #[validate(range(min = 0, message = "Hours cannot be negative"))]
    pub min_hours: i32,

    /// New upper bound, inclusive
    #[validate(range(min = 0, message = "Hours cannot be negative"))]
    pub max_hours: i32,

    /// Whether the tier participates in current state
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Actor recorded as the updater
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_is_active() -> bool {
    true
}

impl TierUpdateRequest {
    /// Convert to a PriceTier entity carrying the target id
    pub fn to_entity(&self) -> PriceTier {
        let mut tier = PriceTier::new(
            self.spot_id,
            self.price,
            self.min_hours,
            self.max_hours,
            self.user_id,
        );
        tier.lifecycle.id = self.id;
        tier.lifecycle.is_active = self.is_active;
        tier.lifecycle.mark_updated(self.user_id);
        tier
    }
}

/// Price tier response
#[derive(Debug, Clone, Serialize)]
pub struct TierResponse {
    /// Tier id
    pub id: i64,

    /// Spot the tier prices
    pub spot_id: i64,

    /// Fee
    pub price: Decimal,

    /// Lower bound, inclusive
    pub min_hours: i32,

    /// Upper bound, inclusive
    pub max_hours: i32,

    /// Whether the tier is active
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PriceTier> for TierResponse {
    fn from(tier: PriceTier) -> Self {
        Self {
            id: tier.lifecycle.id,
            spot_id: tier.spot_id,
            price: tier.price,
            min_hours: tier.min_hours,
            max_hours: tier.max_hours,
            is_active: tier.lifecycle.is_active,
            created_at: tier.lifecycle.created_at,
            updated_at: tier.lifecycle.updated_at,
        }
    }
}
