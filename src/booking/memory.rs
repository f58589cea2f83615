//! In-memory [`BookingStore`] for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    DailyRate, NewReservation, Reservation, ReservationStatus, Room, ServiceCapacity, ServiceType,
};

use super::calculators::StayRange;
use super::queries::ReserveOutcome;
use super::store::BookingStore;

struct ServiceBookingRow {
    service_type: ServiceType,
    date: NaiveDate,
    status: String,
}

#[derive(Default)]
struct Tables {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    rates: Vec<DailyRate>,
    capacity: Vec<ServiceCapacity>,
    service_bookings: Vec<ServiceBookingRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent trait call return a store error.
    pub fn fail_reads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn add_room(&self, base_price: Option<Decimal>) -> Uuid {
        self.add_room_with(None, base_price, 2)
    }

    pub fn add_room_with(
        &self,
        price: Option<Decimal>,
        base_price: Option<Decimal>,
        capacity: i32,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().rooms.push(Room {
            id,
            name: format!("Room {}", &id.to_string()[..8]),
            price,
            base_price,
            beds24_room_id: None,
            capacity,
        });
        id
    }

    pub fn add_reservation(
        &self,
        room_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        status: ReservationStatus,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().reservations.push(Reservation {
            id,
            room_id,
            guest_name: "Existing Guest".into(),
            guest_email: "guest@example.com".into(),
            guests: 1,
            check_in,
            check_out,
            status: status.as_str().into(),
            total_price: Decimal::ZERO,
            currency: "USD".into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_rate(&self, room_id: Uuid, rate_date: NaiveDate, price: Decimal) {
        self.tables.lock().unwrap().rates.push(DailyRate {
            id: Uuid::new_v4(),
            room_id,
            rate_date,
            price,
        });
    }

    pub fn set_capacity(&self, service_type: ServiceType, max_per_day: i32, enabled: bool) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .capacity
            .retain(|c| c.service_type != service_type.as_str());
        tables.capacity.push(ServiceCapacity {
            service_type: service_type.as_str().into(),
            max_per_day,
            enabled,
        });
    }

    pub fn add_service_booking(&self, service_type: ServiceType, date: NaiveDate, status: &str) {
        self.tables
            .lock()
            .unwrap()
            .service_bookings
            .push(ServiceBookingRow {
                service_type,
                date,
                status: status.into(),
            });
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

fn holds_and_overlaps(r: &Reservation, room_id: Uuid, stay: &StayRange) -> bool {
    r.room_id == room_id && r.status().holds_room() && r.stay().overlaps(stay)
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<Room>, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.rooms.iter().find(|r| r.id == room_id).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.enter()?;
        Ok(self.tables.lock().unwrap().rooms.clone())
    }

    async fn overlapping_reservations(
        &self,
        room_id: Uuid,
        stay: &StayRange,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .reservations
            .iter()
            .filter(|r| holds_and_overlaps(r, room_id, stay))
            .cloned()
            .collect())
    }

    async fn daily_rates(
        &self,
        room_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyRate>, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .rates
            .iter()
            .filter(|r| r.room_id == room_id && from <= r.rate_date && r.rate_date < to)
            .cloned()
            .collect())
    }

    async fn reserve(&self, new: &NewReservation) -> Result<ReserveOutcome, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.rooms.iter().any(|r| r.id == new.room_id) {
            return Ok(ReserveOutcome::RoomMissing);
        }
        if tables
            .reservations
            .iter()
            .any(|r| holds_and_overlaps(r, new.room_id, &new.stay))
        {
            return Ok(ReserveOutcome::Conflict);
        }
        let reservation = Reservation {
            id: Uuid::new_v4(),
            room_id: new.room_id,
            guest_name: new.guest_name.clone(),
            guest_email: new.guest_email.clone(),
            guests: new.guests,
            check_in: new.stay.check_in(),
            check_out: new.stay.check_out(),
            status: ReservationStatus::Confirmed.as_str().into(),
            total_price: new.total_price,
            currency: new.currency.clone(),
            created_at: Utc::now(),
        };
        tables.reservations.push(reservation.clone());
        Ok(ReserveOutcome::Created(reservation))
    }

    async fn find_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .cloned())
    }

    async fn cancel_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .map(|r| {
                r.status = ReservationStatus::Cancelled.as_str().into();
                r.clone()
            }))
    }

    async fn set_base_price(
        &self,
        room_id: Uuid,
        base_price: Decimal,
    ) -> Result<Option<Room>, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.rooms.iter_mut().find(|r| r.id == room_id).map(|r| {
            r.base_price = Some(base_price);
            r.clone()
        }))
    }

    async fn upsert_daily_rate(
        &self,
        room_id: Uuid,
        rate_date: NaiveDate,
        price: Decimal,
    ) -> Result<DailyRate, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .rates
            .iter_mut()
            .find(|r| r.room_id == room_id && r.rate_date == rate_date)
        {
            existing.price = price;
            return Ok(existing.clone());
        }
        let rate = DailyRate {
            id: Uuid::new_v4(),
            room_id,
            rate_date,
            price,
        };
        tables.rates.push(rate.clone());
        Ok(rate)
    }

    async fn delete_daily_rate(
        &self,
        room_id: Uuid,
        rate_date: NaiveDate,
    ) -> Result<bool, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.rates.len();
        tables
            .rates
            .retain(|r| !(r.room_id == room_id && r.rate_date == rate_date));
        Ok(tables.rates.len() != before)
    }

    async fn service_capacity(
        &self,
        service_type: ServiceType,
    ) -> Result<Option<ServiceCapacity>, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .capacity
            .iter()
            .find(|c| c.service_type == service_type.as_str())
            .cloned())
    }

    async fn count_service_bookings(
        &self,
        service_type: ServiceType,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .service_bookings
            .iter()
            .filter(|b| b.service_type == service_type && b.date == date && b.status != "cancelled")
            .count() as i64)
    }

    async fn set_service_capacity(
        &self,
        service_type: ServiceType,
        max_per_day: i32,
        enabled: bool,
    ) -> Result<ServiceCapacity, StoreError> {
        self.enter()?;
        self.set_capacity(service_type, max_per_day, enabled);
        Ok(ServiceCapacity {
            service_type: service_type.as_str().into(),
            max_per_day,
            enabled,
        })
    }
}
