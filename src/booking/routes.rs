//! HTTP routes for rooms, availability, quotes, reservations and admin rates.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::models::ServiceType;
use crate::AppState;

use super::calculators::parse_calendar_date;
use super::requests::{
    CreateReservationRequest, RateWindowQuery, ServiceAvailabilityRequest, SetDailyRateRequest,
    SetRoomPricingRequest, SetServiceCapacityRequest, StayRequest,
};
use super::responses::{
    AvailabilityResponse, DailyRateResponse, QuoteResponse, ReservationResponse, RoomResponse,
    ServiceAvailabilityResponse, ServiceCapacityResponse,
};
use super::services::{self, ServiceCapacityResult};
use super::store::BookingStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/:id", get(get_room))
        .route("/api/rooms/:id/availability", post(room_availability))
        .route("/api/rooms/:id/quote", post(quote))
        .route("/api/availability", post(service_availability))
        .route("/api/reservations", post(create_reservation))
        .route("/api/reservations/:id", get(get_reservation))
        .route("/api/reservations/:id/cancel", post(cancel_reservation))
        .route("/api/admin/rooms/:id/pricing", put(set_room_pricing))
        .route("/api/admin/rooms/:id/rates", get(list_rates))
        .route(
            "/api/admin/rooms/:id/rates/:date",
            put(set_rate).delete(delete_rate),
        )
        .route(
            "/api/admin/services/:service_type/capacity",
            put(set_service_capacity),
        )
}

fn parse_date_param(name: &str, raw: &str) -> Result<NaiveDate> {
    parse_calendar_date(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid {}: {}", name, raw)))
}

fn required_date(name: &str, raw: Option<&str>) -> Result<NaiveDate> {
    let raw = raw.ok_or_else(|| AppError::BadRequest(format!("Missing {}", name)))?;
    parse_date_param(name, raw)
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomResponse>>> {
    let rooms = state.store.list_rooms().await?;
    Ok(Json(
        rooms
            .into_iter()
            .map(|r| RoomResponse::from_room(r, &state.config.currency))
            .collect(),
    ))
}

async fn get_room(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<Uuid>,
) -> Result<Json<RoomResponse>> {
    let room = state
        .store
        .cached_room(room_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room not found: {}", room_id)))?;
    Ok(Json(RoomResponse::from_room(
        Arc::unwrap_or_clone(room),
        &state.config.currency,
    )))
}

/// Soft-fails: malformed ids, dates and bodies come back as `available: false`.
async fn room_availability(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<String>,
    body: std::result::Result<Json<StayRequest>, JsonRejection>,
) -> Json<AvailabilityResponse> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let result = services::check_availability(
        &state.store,
        &room_id,
        body.check_in.as_deref().unwrap_or_default(),
        body.check_out.as_deref().unwrap_or_default(),
    )
    .await;
    Json(result.into())
}

async fn quote(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StayRequest>,
) -> Result<Json<QuoteResponse>> {
    let check_in = required_date("check_in", body.check_in.as_deref())?;
    let check_out = required_date("check_out", body.check_out.as_deref())?;
    let quote = services::quote_stay(&state.store, room_id, check_in, check_out).await?;
    Ok(Json(QuoteResponse::from_quote(quote, &state.config.currency)))
}

async fn service_availability(
    State(state): State<AppState>,
    body: std::result::Result<Json<ServiceAvailabilityRequest>, JsonRejection>,
) -> Json<ServiceAvailabilityResponse> {
    let Ok(Json(body)) = body else {
        return Json(ServiceCapacityResult::failed("Invalid request body.").into());
    };
    let result = services::check_service_capacity(
        &state.store,
        body.date.as_deref().unwrap_or_default(),
        body.service_type.as_deref().unwrap_or_default(),
    )
    .await;
    Json(result.into())
}

async fn create_reservation(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>)> {
    let reservation = services::book_room(&state.store, &body, &state.config.currency).await?;
    Ok((StatusCode::CREATED, Json(reservation.into())))
}

async fn get_reservation(
    State(state): State<AppState>,
    ApiPath(reservation_id): ApiPath<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = services::get_reservation(&state.store, reservation_id).await?;
    Ok(Json(reservation.into()))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    ApiPath(reservation_id): ApiPath<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = services::cancel_reservation(&state.store, reservation_id).await?;
    Ok(Json(reservation.into()))
}

async fn set_room_pricing(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<SetRoomPricingRequest>,
) -> Result<Json<RoomResponse>> {
    let room = services::set_room_pricing(&state.store, room_id, body.base_price).await?;
    Ok(Json(RoomResponse::from_room(room, &state.config.currency)))
}

async fn list_rates(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<Uuid>,
    Query(window): Query<RateWindowQuery>,
) -> Result<Json<Vec<DailyRateResponse>>> {
    let from = required_date("from", window.from.as_deref())?;
    let to = required_date("to", window.to.as_deref())?;
    let rates = services::list_daily_rates(&state.store, room_id, from, to).await?;
    Ok(Json(
        rates
            .into_iter()
            .map(|r| DailyRateResponse::from_rate(r, &state.config.currency))
            .collect(),
    ))
}

async fn set_rate(
    State(state): State<AppState>,
    ApiPath((room_id, date)): ApiPath<(Uuid, String)>,
    ApiJson(body): ApiJson<SetDailyRateRequest>,
) -> Result<Json<DailyRateResponse>> {
    let date = parse_date_param("date", &date)?;
    let rate = services::set_daily_rate(&state.store, room_id, date, body.price).await?;
    Ok(Json(DailyRateResponse::from_rate(rate, &state.config.currency)))
}

async fn delete_rate(
    State(state): State<AppState>,
    ApiPath((room_id, date)): ApiPath<(Uuid, String)>,
) -> Result<StatusCode> {
    let date = parse_date_param("date", &date)?;
    services::clear_daily_rate(&state.store, room_id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_service_capacity(
    State(state): State<AppState>,
    ApiPath(service_type): ApiPath<String>,
    ApiJson(body): ApiJson<SetServiceCapacityRequest>,
) -> Result<Json<ServiceCapacityResponse>> {
    let service_type: ServiceType = service_type.parse().map_err(AppError::BadRequest)?;
    let capacity =
        services::set_service_capacity(&state.store, service_type, body.max_per_day, body.enabled)
            .await?;
    Ok(Json(capacity.into()))
}
