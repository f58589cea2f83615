//! Response DTOs for booking API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{DailyRate, Reservation, Room, ServiceCapacity};

use super::services::{AvailabilityResult, ServiceCapacityResult, StayQuote};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: Uuid,
    pub name: String,
    pub base_price: Option<MoneyResponse>,
    pub beds24_room_id: Option<String>,
    pub capacity: i32,
}

impl RoomResponse {
    pub fn from_room(room: Room, currency: &str) -> Self {
        let base_price = room
            .effective_base_price()
            .map(|p| MoneyResponse::new(p, currency));
        Self {
            id: room.id,
            name: room.name,
            base_price,
            beds24_room_id: room.beds24_room_id,
            capacity: room.capacity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<AvailabilityResult> for AvailabilityResponse {
    fn from(result: AvailabilityResult) -> Self {
        Self {
            available: result.available,
            reason: result.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NightlyChargeResponse {
    pub date: NaiveDate,
    pub price: MoneyResponse,
    pub overridden: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub base_price: MoneyResponse,
    pub breakdown: Vec<NightlyChargeResponse>,
    pub total: MoneyResponse,
}

impl QuoteResponse {
    pub fn from_quote(quote: StayQuote, currency: &str) -> Self {
        Self {
            room_id: quote.room_id,
            check_in: quote.stay.check_in(),
            check_out: quote.stay.check_out(),
            nights: quote.stay.nights(),
            base_price: MoneyResponse::new(quote.base_price, currency),
            breakdown: quote
                .nights
                .into_iter()
                .map(|n| NightlyChargeResponse {
                    date: n.date,
                    price: MoneyResponse::new(n.amount, currency),
                    overridden: n.overridden,
                })
                .collect(),
            total: MoneyResponse::new(quote.total, currency),
        }
    }
}

/// Response for `POST /api/availability`
#[derive(Debug, Serialize)]
pub struct ServiceAvailabilityResponse {
    pub success: bool,
    pub available: bool,
    pub current: i64,
    pub max: i32,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ServiceCapacityResult> for ServiceAvailabilityResponse {
    fn from(result: ServiceCapacityResult) -> Self {
        Self {
            success: result.success,
            available: result.available,
            current: result.current,
            max: result.max,
            enabled: result.enabled,
            error: result.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub guests: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: String,
    pub total: MoneyResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            total: MoneyResponse::new(r.total_price, &r.currency),
            id: r.id,
            room_id: r.room_id,
            guest_name: r.guest_name,
            guest_email: r.guest_email,
            guests: r.guests,
            check_in: r.check_in,
            check_out: r.check_out,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyRateResponse {
    pub date: NaiveDate,
    pub price: MoneyResponse,
}

impl DailyRateResponse {
    pub fn from_rate(rate: DailyRate, currency: &str) -> Self {
        Self {
            date: rate.rate_date,
            price: MoneyResponse::new(rate.price, currency),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceCapacityResponse {
    pub service_type: String,
    pub max_per_day: i32,
    pub enabled: bool,
}

impl From<ServiceCapacity> for ServiceCapacityResponse {
    fn from(c: ServiceCapacity) -> Self {
        Self {
            service_type: c.service_type,
            max_per_day: c.max_per_day,
            enabled: c.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_room_response_prefers_base_price() {
        let room = Room {
            id: Uuid::new_v4(),
            name: "Garden Suite".into(),
            price: Some(dec!(80)),
            base_price: Some(dec!(120.5)),
            beds24_room_id: None,
            capacity: 2,
        };

        let response = RoomResponse::from_room(room, "EUR");
        assert_eq!(response.name, "Garden Suite");
        let price = response.base_price.unwrap();
        assert_eq!(price.amount, dec!(120.5));
        assert_eq!(price.currency, "EUR");
    }
}
