//! Booking service functions with store access.
//!
//! Availability never returns an error to its caller: every failure collapses
//! into an unavailable result. Pricing and reservations propagate
//! [`BookingError`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::BookingError;
use crate::models::{NewReservation, Reservation, Room, ServiceCapacity, ServiceType};

use super::calculators::{
    build_rate_lookup, capacity_available, parse_calendar_date, parse_stay, price_nights,
    stay_total, NightlyCharge, StayRange, MAX_STAY_NIGHTS,
};
use super::queries::ReserveOutcome;
use super::requests::CreateReservationRequest;
use super::store::BookingStore;

pub const REASON_INVALID_DATES: &str = "Invalid dates provided.";
pub const REASON_ALREADY_BOOKED: &str = "The room is already booked for the selected dates.";
pub const REASON_CHECK_FAILED: &str = "An error occurred while checking availability.";

/// Result of a room availability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityResult {
    pub available: bool,
    pub reason: Option<&'static str>,
}

impl AvailabilityResult {
    fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    fn unavailable(reason: &'static str) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// Price breakdown for a stay
#[derive(Debug, Clone)]
pub struct StayQuote {
    pub room_id: Uuid,
    pub stay: StayRange,
    pub base_price: Decimal,
    pub nights: Vec<NightlyCharge>,
    pub total: Decimal,
}

/// Result of a daily service capacity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCapacityResult {
    pub success: bool,
    pub available: bool,
    pub current: i64,
    pub max: i32,
    pub enabled: bool,
    pub error: Option<String>,
}

impl ServiceCapacityResult {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            available: false,
            current: 0,
            max: 0,
            enabled: false,
            error: Some(message.into()),
        }
    }
}

/// Check whether a room is free for `[start, end)`.
///
/// Malformed input and store failures both report the room as unavailable.
pub async fn check_availability<S: BookingStore + ?Sized>(
    store: &S,
    room_id: &str,
    start: &str,
    end: &str,
) -> AvailabilityResult {
    let room_id = match Uuid::parse_str(room_id.trim()) {
        Ok(id) => id,
        Err(_) => return AvailabilityResult::unavailable(REASON_INVALID_DATES),
    };
    let Some(stay) = parse_stay(start, end) else {
        return AvailabilityResult::unavailable(REASON_INVALID_DATES);
    };

    check_room_availability(store, room_id, &stay).await
}

/// Typed variant of [`check_availability`] for already-validated input.
pub async fn check_room_availability<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    stay: &StayRange,
) -> AvailabilityResult {
    let candidates = match store.overlapping_reservations(room_id, stay).await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!("Availability check failed for room {}: {}", room_id, e);
            return AvailabilityResult::unavailable(REASON_CHECK_FAILED);
        }
    };

    let booked = candidates
        .iter()
        .any(|r| r.room_id == room_id && r.status().holds_room() && r.stay().overlaps(stay));

    if booked {
        AvailabilityResult::unavailable(REASON_ALREADY_BOOKED)
    } else {
        AvailabilityResult::available()
    }
}

fn validated_stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<StayRange, BookingError> {
    if check_out <= check_in {
        return Err(BookingError::Validation(format!(
            "check_out ({}) must be after check_in ({})",
            check_out, check_in
        )));
    }
    StayRange::new(check_in, check_out).ok_or_else(|| {
        BookingError::Validation(format!(
            "stays are limited to {} nights",
            MAX_STAY_NIGHTS
        ))
    })
}

fn nightly_base_price(room: &Room) -> Result<Decimal, BookingError> {
    room.effective_base_price().ok_or_else(|| {
        BookingError::Validation(format!("Room {} has no nightly price configured", room.id))
    })
}

/// Price a stay night by night.
///
/// Each night costs the room's daily rate for that date if one exists,
/// otherwise its base price. The checkout night is never charged.
pub async fn quote_stay<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<StayQuote, BookingError> {
    let stay = validated_stay(check_in, check_out)?;

    let room = store
        .find_room(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;
    quote_room(store, &room, stay).await
}

async fn quote_room<S: BookingStore + ?Sized>(
    store: &S,
    room: &Room,
    stay: StayRange,
) -> Result<StayQuote, BookingError> {
    let base_price = nightly_base_price(room)?;

    let rates = store
        .daily_rates(room.id, stay.check_in(), stay.check_out())
        .await?;
    let lookup = build_rate_lookup(&rates, &stay);
    let nights = price_nights(&stay, base_price, &lookup);
    let total = stay_total(&nights);

    Ok(StayQuote {
        room_id: room.id,
        stay,
        base_price,
        nights,
        total,
    })
}

/// Total cost of a stay, rounded to cents.
pub async fn calculate_price<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<Decimal, BookingError> {
    Ok(quote_stay(store, room_id, check_in, check_out).await?.total)
}

/// Validate, price and insert a confirmed reservation.
pub async fn book_room<S: BookingStore + ?Sized>(
    store: &S,
    request: &CreateReservationRequest,
    currency: &str,
) -> Result<Reservation, BookingError> {
    request.validate()?;
    let guest_name = request.guest_name.trim();
    if guest_name.is_empty() {
        return Err(BookingError::Validation("guest_name must not be blank".into()));
    }

    let stay = parse_stay(&request.check_in, &request.check_out)
        .ok_or_else(|| BookingError::Validation(REASON_INVALID_DATES.into()))?;

    let room = store
        .find_room(request.room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(request.room_id))?;
    if request.guests > room.capacity {
        return Err(BookingError::Validation(format!(
            "{} guests exceed the room capacity of {}",
            request.guests, room.capacity
        )));
    }

    let quote = quote_room(store, &room, stay).await?;

    let new = NewReservation {
        room_id: room.id,
        guest_name: guest_name.to_string(),
        guest_email: request.guest_email.trim().to_string(),
        guests: request.guests,
        stay,
        total_price: quote.total,
        currency: currency.to_string(),
    };

    match store.reserve(&new).await? {
        ReserveOutcome::Created(reservation) => {
            info!(
                "Reservation {} created for room {} ({} -> {}), total {} {}",
                reservation.id,
                room.id,
                stay.check_in(),
                stay.check_out(),
                reservation.total_price,
                reservation.currency
            );
            Ok(reservation)
        }
        ReserveOutcome::Conflict => {
            warn!("Booking conflict for room {} ({} -> {})", room.id, stay.check_in(), stay.check_out());
            Err(BookingError::Conflict(REASON_ALREADY_BOOKED.into()))
        }
        ReserveOutcome::RoomMissing => Err(BookingError::RoomNotFound(room.id)),
    }
}

pub async fn get_reservation<S: BookingStore + ?Sized>(
    store: &S,
    reservation_id: Uuid,
) -> Result<Reservation, BookingError> {
    store
        .find_reservation(reservation_id)
        .await?
        .ok_or(BookingError::ReservationNotFound(reservation_id))
}

/// Cancel a reservation, releasing its nights. Idempotent.
pub async fn cancel_reservation<S: BookingStore + ?Sized>(
    store: &S,
    reservation_id: Uuid,
) -> Result<Reservation, BookingError> {
    let reservation = store
        .cancel_reservation(reservation_id)
        .await?
        .ok_or(BookingError::ReservationNotFound(reservation_id))?;
    info!("Reservation {} cancelled", reservation_id);
    Ok(reservation)
}

/// Check the daily booking cap of a service.
///
/// A service without a capacity row is unlimited. Store failures fail closed.
pub async fn check_service_capacity<S: BookingStore + ?Sized>(
    store: &S,
    date: &str,
    service_type: &str,
) -> ServiceCapacityResult {
    let Some(date) = parse_calendar_date(date) else {
        return ServiceCapacityResult::failed("Invalid date provided.");
    };
    let service_type: ServiceType = match service_type.parse() {
        Ok(t) => t,
        Err(msg) => return ServiceCapacityResult::failed(msg),
    };

    let lookup = async {
        let settings = store.service_capacity(service_type).await?;
        let current = store.count_service_bookings(service_type, date).await?;
        Ok::<_, crate::error::StoreError>((settings, current))
    };

    match lookup.await {
        Ok((settings, current)) => {
            let (max, enabled) = settings
                .map(|s| (s.max_per_day, s.enabled))
                .unwrap_or((0, false));
            ServiceCapacityResult {
                success: true,
                available: capacity_available(enabled, current, max),
                current,
                max,
                enabled,
                error: None,
            }
        }
        Err(e) => {
            error!("Capacity check failed for {} on {}: {}", service_type, date, e);
            ServiceCapacityResult::failed(REASON_CHECK_FAILED)
        }
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), BookingError> {
    if value.is_sign_negative() {
        return Err(BookingError::Validation(format!("{} must not be negative", field)));
    }
    Ok(())
}

/// Set a room's base nightly price.
pub async fn set_room_pricing<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    base_price: Decimal,
) -> Result<Room, BookingError> {
    ensure_non_negative("base_price", base_price)?;
    let room = store
        .set_base_price(room_id, base_price)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;
    info!("Base price of room {} set to {}", room_id, base_price);
    Ok(room)
}

/// Override the price of a single night.
pub async fn set_daily_rate<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    rate_date: NaiveDate,
    price: Decimal,
) -> Result<crate::models::DailyRate, BookingError> {
    ensure_non_negative("price", price)?;
    store
        .find_room(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;
    let rate = store.upsert_daily_rate(room_id, rate_date, price).await?;
    info!("Daily rate for room {} on {} set to {}", room_id, rate_date, price);
    Ok(rate)
}

/// Remove a single-night override. Errors if there was none.
pub async fn clear_daily_rate<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    rate_date: NaiveDate,
) -> Result<(), BookingError> {
    if !store.delete_daily_rate(room_id, rate_date).await? {
        return Err(BookingError::RateNotFound {
            room_id,
            date: rate_date,
        });
    }
    info!("Daily rate for room {} on {} removed", room_id, rate_date);
    Ok(())
}

/// Overrides in `[from, to)`.
pub async fn list_daily_rates<S: BookingStore + ?Sized>(
    store: &S,
    room_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<crate::models::DailyRate>, BookingError> {
    let range = validated_stay(from, to)?;
    store
        .find_room(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;
    Ok(store
        .daily_rates(room_id, range.check_in(), range.check_out())
        .await?)
}

/// Configure the daily cap of a service.
pub async fn set_service_capacity<S: BookingStore + ?Sized>(
    store: &S,
    service_type: ServiceType,
    max_per_day: i32,
    enabled: bool,
) -> Result<ServiceCapacity, BookingError> {
    if max_per_day < 0 {
        return Err(BookingError::Validation("max_per_day must not be negative".into()));
    }
    let capacity = store
        .set_service_capacity(service_type, max_per_day, enabled)
        .await?;
    info!(
        "Capacity for {} set to {} per day (enabled: {})",
        service_type, max_per_day, enabled
    );
    Ok(capacity)
}
