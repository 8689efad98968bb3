//! Waitlist handlers: join, position, leave.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{
    JoinWaitlistRequest, JoinWaitlistResponse, LeaveWaitlistRequest, MessageResponse,
    WaitlistPositionParams, WaitlistPositionResponse,
};
use crate::app_state::BookingState;
use crate::auth::CurrentUser;
use crate::domain::waitlist::estimated_wait;
use crate::domain::WaitlistStatus;
use crate::error::{ApiError, ErrorResponse};

/// `POST /waitlist/join` — Queue for a sold-out event.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] when seats are available (book
/// directly instead) and [`ApiError::NotFound`] for unknown events.
#[utoipa::path(
    post,
    path = "/api/v1/waitlist/join",
    tag = "Waitlist",
    summary = "Join an event's waitlist",
    description = "Appends the user at the back of the queue. Idempotent: an existing active entry is returned as-is.",
    request_body = JoinWaitlistRequest,
    responses(
        (status = 200, description = "Queued", body = JoinWaitlistResponse),
        (status = 400, description = "Seats available, book directly", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn join(
    user: CurrentUser,
    State(state): State<BookingState>,
    Json(req): Json<JoinWaitlistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .waitlist
        .join(user.user_id, req.event_id, req.quantity)
        .await?;

    Ok(Json(JoinWaitlistResponse {
        waitlist_id: entry.waitlist_id,
        position: entry.position,
        estimated_wait: estimated_wait(entry.position).to_string(),
        status: entry.status.as_str().to_string(),
    }))
}

/// `GET /waitlist/position` — The caller's place in the queue.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the caller has no active entry.
#[utoipa::path(
    get,
    path = "/api/v1/waitlist/position",
    tag = "Waitlist",
    summary = "Get waitlist position",
    params(WaitlistPositionParams),
    responses(
        (status = 200, description = "Queue position", body = WaitlistPositionResponse),
        (status = 404, description = "Not in this waitlist", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn position(
    user: CurrentUser,
    State(state): State<BookingState>,
    Query(params): Query<WaitlistPositionParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (entry, total_waiting) = state
        .waitlist
        .position(user.user_id, params.event_id)
        .await?;

    let offered = entry.status == WaitlistStatus::Offered;
    Ok(Json(WaitlistPositionResponse {
        position: entry.position,
        total_waiting,
        status: entry.status.as_str().to_string(),
        estimated_wait: estimated_wait(entry.position).to_string(),
        quantity_requested: entry.quantity_requested,
        offered_at: offered.then_some(entry.offered_at).flatten(),
        expires_at: offered.then_some(entry.expires_at).flatten(),
    }))
}

/// `DELETE /waitlist/leave` — Leave the queue.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the caller has no active entry.
#[utoipa::path(
    delete,
    path = "/api/v1/waitlist/leave",
    tag = "Waitlist",
    summary = "Leave an event's waitlist",
    request_body = LeaveWaitlistRequest,
    responses(
        (status = 200, description = "Removed", body = MessageResponse),
        (status = 404, description = "Not in this waitlist", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn leave(
    user: CurrentUser,
    State(state): State<BookingState>,
    Json(req): Json<LeaveWaitlistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.waitlist.leave(user.user_id, req.event_id).await?;
    Ok(Json(MessageResponse {
        message: "Successfully removed from waitlist".to_string(),
    }))
}

/// Waitlist routes.
pub fn routes() -> Router<BookingState> {
    Router::new()
        .route("/waitlist/join", post(join))
        .route("/waitlist/position", get(position))
        .route("/waitlist/leave", delete(leave))
}
