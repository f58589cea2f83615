//! Persistence seam for the booking services.
//!
//! Services are generic over [`BookingStore`]; production uses [`PgStore`]
//! (PostgreSQL plus the room cache).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::StoreError;
use crate::models::{DailyRate, NewReservation, Reservation, Room, ServiceCapacity, ServiceType};

use super::calculators::StayRange;
use super::queries::{self, ReserveOutcome};

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Current row from the store of record. Pricing and booking rely on it,
    /// so implementations must not answer from a cache.
    async fn find_room(&self, room_id: Uuid) -> Result<Option<Room>, StoreError>;

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;

    /// Room-holding reservations that overlap `stay`.
    async fn overlapping_reservations(
        &self,
        room_id: Uuid,
        stay: &StayRange,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Rates with `from <= rate_date < to`.
    async fn daily_rates(
        &self,
        room_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyRate>, StoreError>;

    async fn reserve(&self, new: &NewReservation) -> Result<ReserveOutcome, StoreError>;

    async fn find_reservation(&self, reservation_id: Uuid)
        -> Result<Option<Reservation>, StoreError>;

    async fn cancel_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError>;

    async fn set_base_price(
        &self,
        room_id: Uuid,
        base_price: Decimal,
    ) -> Result<Option<Room>, StoreError>;

    async fn upsert_daily_rate(
        &self,
        room_id: Uuid,
        rate_date: NaiveDate,
        price: Decimal,
    ) -> Result<DailyRate, StoreError>;

    async fn delete_daily_rate(&self, room_id: Uuid, rate_date: NaiveDate)
        -> Result<bool, StoreError>;

    async fn service_capacity(
        &self,
        service_type: ServiceType,
    ) -> Result<Option<ServiceCapacity>, StoreError>;

    async fn count_service_bookings(
        &self,
        service_type: ServiceType,
        date: NaiveDate,
    ) -> Result<i64, StoreError>;

    async fn set_service_capacity(
        &self,
        service_type: ServiceType,
        max_per_day: i32,
        enabled: bool,
    ) -> Result<ServiceCapacity, StoreError>;
}

/// PostgreSQL-backed store.
///
/// The room cache only serves [`PgStore::cached_room`]; every trait method
/// reads the database.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
    pub cache: AppCache,
}

impl PgStore {
    pub fn new(pool: PgPool, cache: AppCache) -> Self {
        Self { pool, cache }
    }

    /// Room lookup for display. May lag an admin price edit by up to the cache TTL.
    pub async fn cached_room(&self, room_id: Uuid) -> Result<Option<Arc<Room>>, StoreError> {
        if let Some(cached) = self.cache.rooms.get(&room_id).await {
            tracing::debug!("Cache HIT for room: {}", room_id);
            return Ok(Some(cached));
        }

        tracing::debug!("Cache MISS for room: {}", room_id);
        let Some(room) = db::get_room(&self.pool, room_id).await? else {
            return Ok(None);
        };
        let room = Arc::new(room);
        self.cache.rooms.insert(room_id, room.clone()).await;
        Ok(Some(room))
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<Room>, StoreError> {
        db::get_room(&self.pool, room_id).await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        db::list_rooms(&self.pool).await
    }

    async fn overlapping_reservations(
        &self,
        room_id: Uuid,
        stay: &StayRange,
    ) -> Result<Vec<Reservation>, StoreError> {
        queries::find_overlapping_reservations(&self.pool, room_id, stay).await
    }

    async fn daily_rates(
        &self,
        room_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyRate>, StoreError> {
        queries::get_daily_rates(&self.pool, room_id, from, to).await
    }

    async fn reserve(&self, new: &NewReservation) -> Result<ReserveOutcome, StoreError> {
        queries::insert_reservation_if_free(&self.pool, new).await
    }

    async fn find_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        queries::get_reservation(&self.pool, reservation_id).await
    }

    async fn cancel_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        queries::cancel_reservation(&self.pool, reservation_id).await
    }

    async fn set_base_price(
        &self,
        room_id: Uuid,
        base_price: Decimal,
    ) -> Result<Option<Room>, StoreError> {
        let room = db::update_base_price(&self.pool, room_id, base_price).await?;
        self.cache.invalidate_room(room_id).await;
        Ok(room)
    }

    async fn upsert_daily_rate(
        &self,
        room_id: Uuid,
        rate_date: NaiveDate,
        price: Decimal,
    ) -> Result<DailyRate, StoreError> {
        queries::upsert_daily_rate(&self.pool, room_id, rate_date, price).await
    }

    async fn delete_daily_rate(
        &self,
        room_id: Uuid,
        rate_date: NaiveDate,
    ) -> Result<bool, StoreError> {
        queries::delete_daily_rate(&self.pool, room_id, rate_date).await
    }

    async fn service_capacity(
        &self,
        service_type: ServiceType,
    ) -> Result<Option<ServiceCapacity>, StoreError> {
        queries::get_service_capacity(&self.pool, service_type).await
    }

    async fn count_service_bookings(
        &self,
        service_type: ServiceType,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        queries::count_service_bookings(&self.pool, service_type, date).await
    }

    async fn set_service_capacity(
        &self,
        service_type: ServiceType,
        max_per_day: i32,
        enabled: bool,
    ) -> Result<ServiceCapacity, StoreError> {
        queries::upsert_service_capacity(&self.pool, service_type, max_per_day, enabled).await
    }
}
