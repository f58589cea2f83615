//! Database queries for reservations, daily rates and service capacity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    DailyRate, NewReservation, Reservation, ReservationStatus, ServiceCapacity, ServiceType,
};

use super::calculators::StayRange;

/// SQLSTATE for exclusion constraint violations.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Outcome of a transactional check-and-insert.
#[derive(Debug)]
pub enum ReserveOutcome {
    Created(Reservation),
    Conflict,
    RoomMissing,
}

/// Room-holding reservations overlapping `[check_in, check_out)`.
///
/// Both sides of the half-open overlap test run in the database.
pub async fn find_overlapping_reservations(
    pool: &PgPool,
    room_id: Uuid,
    stay: &StayRange,
) -> Result<Vec<Reservation>, StoreError> {
    let reservations = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT
            id, room_id, guest_name, guest_email, guests,
            check_in, check_out, status, total_price, currency, created_at
        FROM reservations
        WHERE room_id = $1
          AND status <> 'cancelled'
          AND check_out > $2
          AND check_in < $3
        ORDER BY check_in
        "#,
    )
    .bind(room_id)
    .bind(stay.check_in())
    .bind(stay.check_out())
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Lock the room, re-check for overlaps and insert a confirmed reservation.
///
/// The room row lock serializes concurrent bookings for the same room; the
/// exclusion constraint on `reservations` backs it up.
pub async fn insert_reservation_if_free(
    pool: &PgPool,
    new: &NewReservation,
) -> Result<ReserveOutcome, StoreError> {
    let mut tx = pool.begin().await?;

    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(new.room_id)
        .fetch_optional(&mut *tx)
        .await?;

    if locked.is_none() {
        tx.rollback().await?;
        return Ok(ReserveOutcome::RoomMissing);
    }

    let conflicts: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM reservations
        WHERE room_id = $1
          AND status <> 'cancelled'
          AND check_out > $2
          AND check_in < $3
        "#,
    )
    .bind(new.room_id)
    .bind(new.stay.check_in())
    .bind(new.stay.check_out())
    .fetch_one(&mut *tx)
    .await?;

    if conflicts > 0 {
        tx.rollback().await?;
        return Ok(ReserveOutcome::Conflict);
    }

    let inserted = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations
            (id, room_id, guest_name, guest_email, guests,
             check_in, check_out, status, total_price, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id, room_id, guest_name, guest_email, guests,
            check_in, check_out, status, total_price, currency, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.room_id)
    .bind(&new.guest_name)
    .bind(&new.guest_email)
    .bind(new.guests)
    .bind(new.stay.check_in())
    .bind(new.stay.check_out())
    .bind(ReservationStatus::Confirmed.as_str())
    .bind(new.total_price)
    .bind(&new.currency)
    .fetch_one(&mut *tx)
    .await;

    let reservation = match inserted {
        Ok(r) => r,
        Err(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
        {
            return Ok(ReserveOutcome::Conflict);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    Ok(ReserveOutcome::Created(reservation))
}

/// Get a reservation by id
pub async fn get_reservation(
    pool: &PgPool,
    reservation_id: Uuid,
) -> Result<Option<Reservation>, StoreError> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT
            id, room_id, guest_name, guest_email, guests,
            check_in, check_out, status, total_price, currency, created_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(reservation_id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

/// Mark a reservation cancelled. Cancelling twice is a no-op.
pub async fn cancel_reservation(
    pool: &PgPool,
    reservation_id: Uuid,
) -> Result<Option<Reservation>, StoreError> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET status = 'cancelled'
        WHERE id = $1
        RETURNING
            id, room_id, guest_name, guest_email, guests,
            check_in, check_out, status, total_price, currency, created_at
        "#,
    )
    .bind(reservation_id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

/// Daily rates with `from <= rate_date < to`
pub async fn get_daily_rates(
    pool: &PgPool,
    room_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyRate>, StoreError> {
    let rates = sqlx::query_as::<_, DailyRate>(
        r#"
        SELECT id, room_id, rate_date, price
        FROM daily_rates
        WHERE room_id = $1
          AND rate_date >= $2
          AND rate_date < $3
        ORDER BY rate_date
        "#,
    )
    .bind(room_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rates)
}

/// Insert or replace the rate for one night
pub async fn upsert_daily_rate(
    pool: &PgPool,
    room_id: Uuid,
    rate_date: NaiveDate,
    price: Decimal,
) -> Result<DailyRate, StoreError> {
    let rate = sqlx::query_as::<_, DailyRate>(
        r#"
        INSERT INTO daily_rates (id, room_id, rate_date, price)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (room_id, rate_date)
        DO UPDATE SET price = EXCLUDED.price, updated_at = now()
        RETURNING id, room_id, rate_date, price
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(room_id)
    .bind(rate_date)
    .bind(price)
    .fetch_one(pool)
    .await?;

    Ok(rate)
}

/// Remove the rate for one night. Returns whether a row was deleted.
pub async fn delete_daily_rate(
    pool: &PgPool,
    room_id: Uuid,
    rate_date: NaiveDate,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM daily_rates WHERE room_id = $1 AND rate_date = $2")
        .bind(room_id)
        .bind(rate_date)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Capacity settings for a service, if configured
pub async fn get_service_capacity(
    pool: &PgPool,
    service_type: ServiceType,
) -> Result<Option<ServiceCapacity>, StoreError> {
    let capacity = sqlx::query_as::<_, ServiceCapacity>(
        r#"
        SELECT service_type, max_per_day, enabled
        FROM service_capacity
        WHERE service_type = $1
        "#,
    )
    .bind(service_type.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(capacity)
}

/// Count non-cancelled bookings of a service on one date
pub async fn count_service_bookings(
    pool: &PgPool,
    service_type: ServiceType,
    service_date: NaiveDate,
) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM service_bookings
        WHERE service_type = $1
          AND service_date = $2
          AND status <> 'cancelled'
        "#,
    )
    .bind(service_type.as_str())
    .bind(service_date)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Create or update the capacity settings for a service
pub async fn upsert_service_capacity(
    pool: &PgPool,
    service_type: ServiceType,
    max_per_day: i32,
    enabled: bool,
) -> Result<ServiceCapacity, StoreError> {
    let capacity = sqlx::query_as::<_, ServiceCapacity>(
        r#"
        INSERT INTO service_capacity (service_type, max_per_day, enabled)
        VALUES ($1, $2, $3)
        ON CONFLICT (service_type)
        DO UPDATE SET max_per_day = EXCLUDED.max_per_day, enabled = EXCLUDED.enabled
        RETURNING service_type, max_per_day, enabled
        "#,
    )
    .bind(service_type.as_str())
    .bind(max_per_day)
    .bind(enabled)
    .fetch_one(pool)
    .await?;

    Ok(capacity)
}
