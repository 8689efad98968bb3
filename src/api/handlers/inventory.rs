//! Inventory service handlers: the three internal operations the booking
//! orchestrator consumes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::UpdateAvailabilityRequest;
use crate::app_state::InventoryState;
use crate::auth::InternalAuth;
use crate::error::{ApiError, ErrorResponse};

/// `GET /internal/events/{id}` — Fetch-for-booking.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for absent, draft, or cancelled events.
#[utoipa::path(
    get,
    path = "/internal/events/{id}",
    tag = "Inventory",
    summary = "Fetch an event for booking",
    description = "Returns the booking-relevant slice of a published (or sold-out) event, including the optimistic-concurrency version.",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event record", body = serde_json::Value),
        (status = 404, description = "Event not bookable", body = ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_event_for_booking(
    _auth: InternalAuth,
    State(state): State<InventoryState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.inventory.fetch_for_booking(id).await?;
    Ok(Json(event))
}

/// `POST /internal/events/{id}/update-availability` — Version-guarded seat
/// delta. Negative reserves, positive returns.
///
/// # Errors
///
/// Returns 409 [`ApiError::VersionConflict`] / [`ApiError::SoldOut`] when
/// the CAS or the capacity bound rejects the write.
#[utoipa::path(
    post,
    path = "/internal/events/{id}/update-availability",
    tag = "Inventory",
    summary = "Apply a seat delta",
    request_body = UpdateAvailabilityRequest,
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "New inventory state", body = serde_json::Value),
        (status = 409, description = "Version or capacity conflict", body = ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn update_availability(
    _auth: InternalAuth,
    State(state): State<InventoryState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .inventory
        .apply_delta(id, req.quantity, req.version)
        .await?;
    Ok(Json(snapshot))
}

/// `POST /internal/events/{id}/return-seats` — Positive-delta variant used
/// on cancel/expire paths.
///
/// # Errors
///
/// Rejects non-positive quantities; otherwise as `update-availability`.
#[utoipa::path(
    post,
    path = "/internal/events/{id}/return-seats",
    tag = "Inventory",
    summary = "Return seats",
    request_body = UpdateAvailabilityRequest,
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "New inventory state", body = serde_json::Value),
        (status = 409, description = "Version conflict", body = ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn return_seats(
    _auth: InternalAuth,
    State(state): State<InventoryState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .inventory
        .return_seats(id, req.quantity, req.version)
        .await?;
    Ok(Json(snapshot))
}

/// Inventory internal routes.
pub fn routes() -> Router<InventoryState> {
    Router::new()
        .route("/internal/events/{id}", get(get_event_for_booking))
        .route(
            "/internal/events/{id}/update-availability",
            post(update_availability),
        )
        .route("/internal/events/{id}/return-seats", post(return_seats))
}
