//! Internal booking endpoints, guarded by the shared API key.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::app_state::BookingState;
use crate::auth::InternalAuth;
use crate::error::ApiError;

use super::bookings::detail_response;

/// `GET /internal/bookings/{id}` — Booking detail without ownership checks,
/// for sibling services.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an absent booking.
#[utoipa::path(
    get,
    path = "/internal/bookings/{id}",
    tag = "Internal",
    summary = "Get a booking (service-to-service)",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking detail", body = serde_json::Value),
        (status = 404, description = "Booking not found"),
    ),
    security(("api_key" = []))
)]
pub async fn get_booking_internal(
    _auth: InternalAuth,
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.bookings.get_booking_internal(id).await?;
    Ok(Json(detail_response(detail)))
}

/// `POST /internal/bookings/expire-reservations` — Run one sweep now.
///
/// # Errors
///
/// Returns [`ApiError::Database`] if the batch query fails.
#[utoipa::path(
    post,
    path = "/internal/bookings/expire-reservations",
    tag = "Internal",
    summary = "Run one expiry sweep",
    responses(
        (status = 200, description = "Sweep report", body = serde_json::Value),
    ),
    security(("api_key" = []))
)]
pub async fn expire_reservations(
    _auth: InternalAuth,
    State(state): State<BookingState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.bookings.run_sweep().await?;
    Ok(Json(report))
}

/// `POST /internal/bookings/force-expire-all` — Expire every pending
/// booking regardless of its deadline. Operational tool, not a correctness
/// primitive.
///
/// # Errors
///
/// Returns [`ApiError::InvalidState`] when a full sweep is already running.
#[utoipa::path(
    post,
    path = "/internal/bookings/force-expire-all",
    tag = "Internal",
    summary = "Force-expire every pending booking",
    responses(
        (status = 200, description = "Sweep report", body = serde_json::Value),
        (status = 409, description = "A full sweep is already running"),
    ),
    security(("api_key" = []))
)]
pub async fn force_expire_all(
    _auth: InternalAuth,
    State(state): State<BookingState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.bookings.force_expire_all().await?;
    Ok(Json(report))
}

/// Internal routes (mounted at the root, not under `/api/v1`).
pub fn routes() -> Router<BookingState> {
    Router::new()
        .route("/internal/bookings/{id}", get(get_booking_internal))
        .route(
            "/internal/bookings/expire-reservations",
            post(expire_reservations),
        )
        .route("/internal/bookings/force-expire-all", post(force_expire_all))
}
