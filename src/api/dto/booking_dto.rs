//! Booking DTOs: availability, reserve, confirm, detail, cancel, list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for `GET /bookings/check-availability`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckAvailabilityParams {
    /// Event to check.
    pub event_id: Uuid,
    /// Requested seat count.
    pub quantity: i32,
}

/// Response body for `GET /bookings/check-availability`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAvailabilityResponse {
    /// Whether the requested quantity fits.
    pub available: bool,
    /// Seats available.
    pub available_seats: i32,
    /// Per-booking ticket cap.
    pub max_per_booking: i32,
    /// Price per seat.
    pub base_price: f64,
}

/// Request body for `POST /bookings/reserve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReserveRequest {
    /// Event to reserve on.
    pub event_id: Uuid,
    /// Seats to reserve.
    pub quantity: i32,
    /// Caller token that makes retries safe.
    pub idempotency_key: String,
}

/// Response body for `POST /bookings/reserve`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    /// Use this id to confirm.
    pub reservation_id: Uuid,
    /// Short human code.
    pub booking_reference: String,
    /// Hold deadline.
    pub expires_at: DateTime<Utc>,
    /// Amount due on confirm.
    pub total_amount: f64,
}

/// Request body for `POST /bookings/confirm`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    /// Reservation (booking) id from the reserve step.
    pub reservation_id: Uuid,
    /// Opaque gateway token.
    pub payment_token: String,
    /// Payment method label.
    pub payment_method: String,
}

/// Payment summary inside a confirmation response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentInfoDto {
    /// Gateway transaction id.
    pub transaction_id: String,
    /// Gateway-reported status.
    pub status: String,
    /// Charged amount.
    pub amount: f64,
}

/// Response body for `POST /bookings/confirm`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmationResponse {
    /// Confirmed booking id.
    pub booking_id: Uuid,
    /// Short human code.
    pub booking_reference: String,
    /// Always `"confirmed"`.
    pub status: String,
    /// QR ticket URL.
    pub ticket_url: String,
    /// Payment summary.
    pub payment: PaymentInfoDto,
}

/// Booking detail for `GET /bookings/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDetailResponse {
    /// Booking id.
    pub booking_id: Uuid,
    /// Short human code.
    pub booking_reference: String,
    /// Event name, when the event is still visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Seats held.
    pub quantity: i32,
    /// Total amount.
    pub total_amount: f64,
    /// Lifecycle status string.
    pub status: String,
    /// Payment status string.
    pub payment_status: String,
    /// QR ticket URL, once confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    /// Hold deadline, while pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Reservation timestamp.
    pub booked_at: DateTime<Utc>,
    /// Confirmation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// One row of a user's booking list.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingSummaryDto {
    /// Booking id.
    pub booking_id: Uuid,
    /// Short human code.
    pub booking_reference: String,
    /// Seats held.
    pub quantity: i32,
    /// Total amount.
    pub total_amount: f64,
    /// Lifecycle status string.
    pub status: String,
    /// Payment status string.
    pub payment_status: String,
    /// Reservation timestamp.
    pub booked_at: DateTime<Utc>,
    /// Confirmation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Paginated list for `GET /bookings/user/{user_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Page of bookings, newest first.
    pub bookings: Vec<BookingSummaryDto>,
    /// Total bookings for the user.
    pub total: i64,
    /// Current page.
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Total pages.
    pub total_pages: i64,
}

/// Response body for `DELETE /bookings/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancellationResponse {
    /// Human confirmation.
    pub message: String,
    /// `"processed"` or `"none"`.
    pub refund_status: String,
    /// Refunded amount per the tiered policy.
    pub refund_amount: f64,
}

/// Minimal `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human confirmation.
    pub message: String,
}
