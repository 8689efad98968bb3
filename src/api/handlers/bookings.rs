//! Booking handlers: availability, reserve, confirm, detail, cancel,
//! manual expiry, and the user's booking list.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    BookingDetailResponse, BookingListResponse, BookingSummaryDto, CancellationResponse,
    CheckAvailabilityParams, CheckAvailabilityResponse, ConfirmRequest, ConfirmationResponse,
    MessageResponse, PaginationParams, PaymentInfoDto, ReservationResponse, ReserveRequest,
};
use crate::app_state::BookingState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};

/// `GET /bookings/check-availability` — Read-only availability probe.
///
/// # Errors
///
/// Returns [`ApiError`] on bad parameters or an unbookable event.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/check-availability",
    tag = "Bookings",
    summary = "Check seat availability",
    description = "Returns whether the requested quantity is currently available, served from a short-TTL cache when possible. Never mutates inventory.",
    params(CheckAvailabilityParams),
    responses(
        (status = 200, description = "Availability snapshot", body = CheckAvailabilityResponse),
        (status = 400, description = "Bad parameters", body = ErrorResponse),
        (status = 404, description = "Event not bookable", body = ErrorResponse),
    )
)]
pub async fn check_availability(
    State(state): State<BookingState>,
    Query(params): Query<CheckAvailabilityParams>,
) -> Result<impl IntoResponse, ApiError> {
    let availability = state
        .bookings
        .check_availability(params.event_id, params.quantity)
        .await?;

    Ok(Json(CheckAvailabilityResponse {
        available: availability.available,
        available_seats: availability.available_seats,
        max_per_booking: availability.max_per_booking,
        base_price: availability.base_price,
    }))
}

/// `POST /bookings/reserve` — Reserve seats (phase one).
///
/// # Errors
///
/// Returns [`ApiError`] per the reserve flow: 400 invalid quantity,
/// 429 rate limited, 409 sold out or version conflict.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/reserve",
    tag = "Bookings",
    summary = "Reserve seats",
    description = "Decrements inventory under optimistic concurrency and opens a bounded-lifetime hold. Safe to retry with the same idempotency key.",
    request_body = ReserveRequest,
    responses(
        (status = 200, description = "Seats held", body = ReservationResponse),
        (status = 400, description = "Invalid quantity or missing key", body = ErrorResponse),
        (status = 409, description = "Sold out or version conflict", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn reserve(
    user: CurrentUser,
    State(state): State<BookingState>,
    Json(req): Json<ReserveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .bookings
        .reserve(user.user_id, req.event_id, req.quantity, &req.idempotency_key)
        .await?;

    Ok(Json(ReservationResponse {
        reservation_id: reservation.reservation_id,
        booking_reference: reservation.booking_reference,
        expires_at: reservation.expires_at,
        total_amount: reservation.total_amount,
    }))
}

/// `POST /bookings/confirm` — Confirm a reservation (phase two).
///
/// # Errors
///
/// Returns [`ApiError`]: 400 hold expired, 403 not owner, 409 not pending.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/confirm",
    tag = "Bookings",
    summary = "Confirm a reservation",
    description = "Charges the (mock) gateway, records the payment, and flips the booking to confirmed.",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Booking confirmed", body = ConfirmationResponse),
        (status = 400, description = "Hold expired", body = ErrorResponse),
        (status = 403, description = "Not the reservation owner", body = ErrorResponse),
        (status = 409, description = "Booking not pending", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn confirm(
    user: CurrentUser,
    State(state): State<BookingState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state
        .bookings
        .confirm(
            user.user_id,
            req.reservation_id,
            &req.payment_token,
            &req.payment_method,
        )
        .await?;

    Ok(Json(ConfirmationResponse {
        booking_id: confirmation.booking.booking_id,
        booking_reference: confirmation.booking.booking_reference.clone(),
        status: confirmation.booking.status.as_str().to_string(),
        ticket_url: confirmation.ticket_url,
        payment: PaymentInfoDto {
            transaction_id: confirmation.payment.gateway_txn_id,
            status: confirmation.payment.status,
            amount: confirmation.payment.amount,
        },
    }))
}

/// `GET /bookings/{id}` — Booking detail for the owner.
///
/// # Errors
///
/// Returns [`ApiError`]: 403 not owner, 404 absent.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get booking details",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking detail", body = BookingDetailResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn get_booking(
    user: CurrentUser,
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.bookings.get_booking(user.user_id, id).await?;
    Ok(Json(detail_response(detail)))
}

/// `DELETE /bookings/{id}` — Cancel a booking with the tiered refund.
///
/// # Errors
///
/// Returns [`ApiError`]: 403 not owner, 409 already terminal.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Cancel a booking",
    description = "Cancels the booking, computes the tiered refund, returns seats to inventory for confirmed bookings, and wakes the waitlist.",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Cancelled", body = CancellationResponse),
        (status = 409, description = "Already cancelled or expired", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn cancel_booking(
    user: CurrentUser,
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cancellation = state.bookings.cancel(user.user_id, id).await?;
    Ok(Json(CancellationResponse {
        message: "Booking cancelled successfully".to_string(),
        refund_status: cancellation.refund_status.as_str().to_string(),
        refund_amount: cancellation.refund_amount,
    }))
}

/// `POST /bookings/{id}/expire` — Manually release a pending hold.
///
/// # Errors
///
/// Returns [`ApiError`]: 403 not owner, 409 not pending.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/expire",
    tag = "Bookings",
    summary = "Expire a pending reservation early",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Expired", body = MessageResponse),
        (status = 409, description = "Not pending", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn expire_booking(
    user: CurrentUser,
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.bookings.manual_expire(user.user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Reservation expired successfully".to_string(),
    }))
}

/// `GET /bookings/user/{user_id}` — Paginated booking history.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when the path user is not the caller.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/user/{user_id}",
    tag = "Bookings",
    summary = "List a user's bookings",
    params(
        ("user_id" = Uuid, Path, description = "User id; must match the token subject"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Paginated bookings", body = BookingListResponse),
        (status = 403, description = "Not your history", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list_bookings(
    user: CurrentUser,
    State(state): State<BookingState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    if user_id != user.user_id {
        return Err(ApiError::Forbidden("access denied".to_string()));
    }

    let params = params.clamped();
    let (bookings, total) = state
        .bookings
        .list_bookings(user.user_id, params.limit, params.offset())
        .await?;

    let rows = bookings
        .into_iter()
        .map(|b| BookingSummaryDto {
            booking_id: b.booking_id,
            booking_reference: b.booking_reference,
            quantity: b.quantity,
            total_amount: b.total_amount,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            booked_at: b.booked_at,
            confirmed_at: b.confirmed_at,
        })
        .collect();

    Ok(Json(BookingListResponse {
        bookings: rows,
        total,
        page: params.page,
        limit: params.limit,
        total_pages: (total + params.limit - 1) / params.limit,
    }))
}

/// Booking routes.
pub fn routes() -> Router<BookingState> {
    Router::new()
        .route("/bookings/check-availability", get(check_availability))
        .route("/bookings/reserve", post(reserve))
        .route("/bookings/confirm", post(confirm))
        .route("/bookings/{id}", get(get_booking).delete(cancel_booking))
        .route("/bookings/{id}/expire", post(expire_booking))
        .route("/bookings/user/{user_id}", get(list_bookings))
}

pub(crate) fn detail_response(
    detail: crate::service::booking::BookingDetail,
) -> BookingDetailResponse {
    let booking = detail.booking;
    BookingDetailResponse {
        booking_id: booking.booking_id,
        booking_reference: booking.booking_reference,
        event_name: detail.event_name,
        quantity: booking.quantity,
        total_amount: booking.total_amount,
        status: booking.status.as_str().to_string(),
        payment_status: booking.payment_status.as_str().to_string(),
        ticket_url: detail.payment.and_then(|p| p.ticket_url),
        expires_at: booking.expires_at,
        booked_at: booking.booked_at,
        confirmed_at: booking.confirmed_at,
    }
}
