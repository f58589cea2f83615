//! Reservation models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::booking::calculators::StayRange;

/// Lifecycle of a reservation: pending -> confirmed -> cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Unknown values are read as `Pending` so they keep holding the room.
    pub fn parse(value: &str) -> Self {
        match value {
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Pending,
        }
    }

    pub fn holds_room(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

/// Reservation from `reservations`
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub guests: i32,
    pub check_in: NaiveDate,
    /// Exclusive: the checkout night is neither occupied nor charged.
    pub check_out: NaiveDate,
    pub status: String,
    pub total_price: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn status(&self) -> ReservationStatus {
        ReservationStatus::parse(&self.status)
    }

    pub fn stay(&self) -> StayRange {
        StayRange::from_stored(self.check_in, self.check_out)
    }
}

/// Insert payload for a reservation that has already been priced.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub room_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub guests: i32,
    pub stay: StayRange,
    pub total_price: Decimal,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_only_cancelled_releases_the_room() {
        assert!(ReservationStatus::Pending.holds_room());
        assert!(ReservationStatus::Confirmed.holds_room());
        assert!(!ReservationStatus::Cancelled.holds_room());
        assert!(ReservationStatus::parse("on_hold").holds_room());
    }
}
