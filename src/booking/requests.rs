//! Request DTOs for booking API endpoints.
//!
//! Dates arrive as strings so malformed values reach the services, which
//! decide whether to reject or soft-fail. Fields of the soft-failing
//! requests are optional so a missing or `null` value is handled the same
//! way as a malformed one.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to check a room or quote a stay
#[derive(Debug, Default, Deserialize)]
pub struct StayRequest {
    #[serde(default, alias = "start", alias = "checkIn")]
    pub check_in: Option<String>,
    #[serde(default, alias = "end", alias = "checkOut")]
    pub check_out: Option<String>,
}

/// Request to check the daily capacity of a service
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAvailabilityRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "service_type")]
    pub service_type: Option<String>,
}

/// Request to book a room
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub room_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub guest_name: String,
    #[validate(email)]
    pub guest_email: String,
    #[validate(range(min = 1, max = 20))]
    pub guests: i32,
    pub check_in: String,
    pub check_out: String,
}

/// Request to change a room's base nightly price
#[derive(Debug, Deserialize)]
pub struct SetRoomPricingRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
}

/// Request to set the price of one night
#[derive(Debug, Deserialize)]
pub struct SetDailyRateRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Query window for listing daily rates
#[derive(Debug, Deserialize)]
pub struct RateWindowQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Request to configure a service's daily cap
#[derive(Debug, Deserialize)]
pub struct SetServiceCapacityRequest {
    pub max_per_day: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stay_request_accepts_aliases_and_missing_fields() {
        let body: StayRequest =
            serde_json::from_str(r#"{"start":"2025-01-01","end":"2025-01-05"}"#).unwrap();
        assert_eq!(body.check_in.as_deref(), Some("2025-01-01"));
        assert_eq!(body.check_out.as_deref(), Some("2025-01-05"));

        let body: StayRequest =
            serde_json::from_str(r#"{"check_in":"2025-01-01","check_out":null}"#).unwrap();
        assert!(body.check_out.is_none());

        let body: StayRequest = serde_json::from_str("{}").unwrap();
        assert!(body.check_in.is_none() && body.check_out.is_none());
    }
}
