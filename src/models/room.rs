//! Room model

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Room from `rooms`
#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    /// Legacy nightly price, superseded by `base_price`.
    pub price: Option<Decimal>,
    pub base_price: Option<Decimal>,
    /// Room identifier in the Beds24 property-management system.
    pub beds24_room_id: Option<String>,
    /// Maximum number of guests.
    pub capacity: i32,
}

impl Room {
    /// Default nightly rate: `base_price` when set, otherwise the legacy `price`.
    pub fn effective_base_price(&self) -> Option<Decimal> {
        self.base_price.or(self.price)
    }
}
