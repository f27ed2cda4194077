//! Vehicle DTOs
//!
//! Request and response types for admission, settlement, and vehicle
//! administration endpoints. The two gate outcomes (admission and fee
//! settlement) serialize with camelCase keys.

use chrono::{DateTime, Utc};
use parkflow_core::models::{SizeClass, Vehicle};
use parkflow_core::traits::{AdmissionOutcome, SettlementOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_user_id() -> i64 {
    1
}

/// Vehicle admission request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VehicleCreateRequest {
    /// License plate as given at the gate
    #[validate(length(min = 1, max = 31, message = "License plate is required"))]
    pub license_plate: String,

    /// Size class used to route the vehicle to a spot
    pub size: SizeClass,

    /// Actor recorded as the creator
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl VehicleCreateRequest {
    /// Convert to a Vehicle entity
    pub fn to_entity(&self) -> Vehicle {
        Vehicle::new(self.license_plate.clone(), self.size, self.user_id)
    }
}

/// Vehicle update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleUpdateRequest {
    /// Id of the vehicle to update
    pub id: i64,

    /// New license plate
    #[validate(length(min = 1, max = 31, message = "License plate is required"))]
    pub license_plate: String,

    /// New size class
    pub size: SizeClass,

    /// Whether the vehicle participates in current state
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Actor recorded as the updater
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_is_active() -> bool {
    true
}

impl VehicleUpdateRequest {
    /// Convert to a Vehicle entity carrying the target id
    pub fn to_entity(&self) -> Vehicle {
        let mut vehicle = Vehicle::new(self.license_plate.clone(), self.size, self.user_id);
        vehicle.lifecycle.id = self.id;
        vehicle.lifecycle.is_active = self.is_active;
        vehicle.lifecycle.mark_updated(self.user_id);
        vehicle
    }
}

/// Vehicle response
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    /// Vehicle id
    pub id: i64,

    /// License plate
    pub license_plate: String,

    /// Size class
    pub size: SizeClass,

    /// Admission timestamp
    pub entry_time: DateTime<Utc>,

    /// Settlement timestamp, absent while parked
    pub exit_time: Option<DateTime<Utc>>,

    /// Final fee, zero while parked
    pub total_fee: Decimal,

    /// Whether the vehicle is still parked
    pub is_active: bool,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.lifecycle.id,
            license_plate: vehicle.license_plate,
            size: vehicle.size,
            entry_time: vehicle.entry_time,
            exit_time: vehicle.exit_time,
            total_fee: vehicle.total_fee,
            is_active: vehicle.lifecycle.is_active,
        }
    }
}

/// Admission outcome as returned to the gate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// True when the vehicle was admitted
    pub is_success: bool,

    /// Outcome message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The admitted vehicle; absent on rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleResponse>,
}

impl From<AdmissionOutcome> for AdmissionResponse {
    fn from(outcome: AdmissionOutcome) -> Self {
        Self {
            is_success: outcome.success,
            message: outcome.message,
            vehicle: outcome.vehicle.map(VehicleResponse::from),
        }
    }
}

/// Fee settlement outcome as returned to the gate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    /// True when a fee was computed and both rows were closed
    pub is_success: bool,

    /// Outcome message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Computed fee; zero on an unsuccessful outcome
    pub price: Decimal,

    /// Whole hours the fee covers
    pub elapsed_hours: i64,

    /// Admission timestamp
    pub entry_time: Option<DateTime<Utc>>,

    /// Settlement timestamp
    pub exit_time: Option<DateTime<Utc>>,
}

impl From<SettlementOutcome> for SettlementResponse {
    fn from(outcome: SettlementOutcome) -> Self {
        Self {
            is_success: outcome.success,
            message: outcome.message,
            price: outcome.price,
            elapsed_hours: outcome.elapsed_hours,
            entry_time: outcome.entry_time,
            exit_time: outcome.exit_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_vehicle_create_request_to_entity() {
        let req = VehicleCreateRequest {
            license_plate: "34AB123".to_string(),
            size: SizeClass::Small,
            user_id: 5,
        };

        let vehicle = req.to_entity();
        assert_eq!(vehicle.license_plate, "34AB123");
        assert_eq!(vehicle.lifecycle.created_by, 5);
        assert_eq!(vehicle.total_fee, Decimal::ZERO);
        assert!(vehicle.exit_time.is_none());
    }

    #[test]
    fn test_vehicle_create_request_validation() {
        let req = VehicleCreateRequest {
            license_plate: String::new(),
            size: SizeClass::Small,
            user_id: 1,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_settlement_response_serializes_camel_case() {
        let outcome = SettlementOutcome {
            success: true,
            message: Some("Parking fee calculated.".to_string()),
            price: dec!(10.00),
            elapsed_hours: 2,
            entry_time: Some(Utc::now()),
            exit_time: Some(Utc::now()),
        };

        let json = serde_json::to_string(&SettlementResponse::from(outcome)).unwrap();
        assert!(json.contains("\"isSuccess\":true"));
        assert!(json.contains("\"elapsedHours\":2"));
        assert!(json.contains("\"entryTime\""));
        assert!(json.contains("\"exitTime\""));
    }

    #[test]
    fn test_admission_response_from_rejected_outcome() {
        let response = AdmissionResponse::from(AdmissionOutcome::rejected("lot full"));
        assert!(!response.is_success);
        assert!(response.vehicle.is_none());
        assert_eq!(response.message.as_deref(), Some("lot full"));
    }

    #[test]
    fn test_admission_response_from_accepted_outcome() {
        let vehicle = Vehicle::new("34AB123", SizeClass::Small, 1);
        let response = AdmissionResponse::from(AdmissionOutcome::accepted(vehicle, "added"));
        assert!(response.is_success);
        assert_eq!(response.vehicle.unwrap().license_plate, "34AB123");
    }
}
