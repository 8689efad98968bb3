//! Booking lifecycle types, the ephemeral hold payload, and the refund
//! policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle status.
///
/// `pending` is the only non-terminal state other than `confirmed`;
/// `confirmed` may still move to `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Seats decremented, awaiting payment, deadline running.
    Pending,
    /// Paid. Seats stay consumed until cancellation.
    Confirmed,
    /// Cancelled by the user.
    Cancelled,
    /// Reaped by the sweeper (or manually) after the hold deadline.
    Expired,
}

impl BookingStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Parses the database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Whether no further transitions are allowed from this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired)
    }
}

/// Payment progress attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Nothing charged yet.
    Pending,
    /// Mock gateway accepted the charge.
    Completed,
    /// Refunded after cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
        }
    }

    /// Parses the database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// A booking row.
#[derive(Debug, Clone)]
pub struct Booking {
    /// Primary key; doubles as the reservation id on the wire.
    pub booking_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Booked event.
    pub event_id: Uuid,
    /// Short human code, `EVT-XXXXXX`.
    pub booking_reference: String,
    /// Seats held by this booking.
    pub quantity: i32,
    /// `base_price × quantity` at reservation time.
    pub total_amount: f64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment progress.
    pub payment_status: PaymentStatus,
    /// Caller-supplied retry token; unique when present.
    pub idempotency_key: Option<String>,
    /// Hold deadline while pending.
    pub expires_at: Option<DateTime<Utc>>,
    /// Reservation timestamp.
    pub booked_at: DateTime<Utc>,
    /// Confirmation timestamp.
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// A payment row for a confirmed booking.
#[derive(Debug, Clone)]
pub struct Payment {
    /// Primary key.
    pub payment_id: Uuid,
    /// Booking this payment belongs to.
    pub booking_id: Uuid,
    /// Charged amount.
    pub amount: f64,
    /// Gateway-reported status.
    pub status: String,
    /// Mock gateway transaction id.
    pub gateway_txn_id: String,
    /// QR ticket URL.
    pub ticket_url: Option<String>,
}

/// Ephemeral reservation hold stored in Redis, keyed by booking id.
///
/// The TTL equals the hold duration; absence of the key means the hold is
/// gone regardless of what the booking row says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationHold {
    /// Owning user.
    pub user_id: Uuid,
    /// Booked event.
    pub event_id: Uuid,
    /// Seats held.
    pub quantity: i32,
    /// Total amount due on confirm.
    pub amount: f64,
    /// Short human code.
    pub booking_reference: String,
    /// Hold deadline.
    pub expires_at: DateTime<Utc>,
}

/// Outcome of the tiered refund policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundStatus {
    /// A non-zero refund was issued.
    Processed,
    /// Nothing to refund.
    None,
}

impl RefundStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::None => "none",
        }
    }
}

/// Tiered cancellation refund: full refund more than 24 h before the event
/// starts, half refund more than 2 h before, nothing inside 2 h.
#[must_use]
pub fn refund_amount(total_amount: f64, starts_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let until_start = starts_at - now;
    if until_start > chrono::Duration::hours(24) {
        total_amount
    } else if until_start > chrono::Duration::hours(2) {
        total_amount * 0.5
    } else {
        0.0
    }
}

/// Classifies a refund amount for the cancellation response.
#[must_use]
pub fn refund_status(amount: f64) -> RefundStatus {
    if amount > 0.0 {
        RefundStatus::Processed
    } else {
        RefundStatus::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours_from_now: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + chrono::Duration::hours(hours_from_now), now)
    }

    #[test]
    fn full_refund_beyond_24_hours() {
        let (starts_at, now) = at(48);
        assert_eq!(refund_amount(200.0, starts_at, now), 200.0);
        assert_eq!(refund_status(200.0), RefundStatus::Processed);
    }

    #[test]
    fn half_refund_between_2_and_24_hours() {
        let (starts_at, now) = at(10);
        assert_eq!(refund_amount(200.0, starts_at, now), 100.0);
    }

    #[test]
    fn no_refund_inside_2_hours() {
        let (starts_at, now) = at(1);
        assert_eq!(refund_amount(200.0, starts_at, now), 0.0);
        assert_eq!(refund_status(0.0), RefundStatus::None);
    }

    #[test]
    fn no_refund_after_start() {
        let (starts_at, now) = at(-3);
        assert_eq!(refund_amount(200.0, starts_at, now), 0.0);
    }

    #[test]
    fn booking_status_round_trips() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("held"), None);
    }

    #[test]
    fn cancelled_and_expired_are_terminal() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Expired.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }
}
