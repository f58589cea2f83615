//! Per-date rate override

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// DailyRate from `daily_rates`. Unique per (room_id, rate_date).
#[derive(Debug, Clone, FromRow)]
pub struct DailyRate {
    pub id: Uuid,
    pub room_id: Uuid,
    pub rate_date: NaiveDate,
    pub price: Decimal,
}
