//! Event inventory facet: the slice of an event the booking flow needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an event's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Not yet published; invisible to booking.
    Draft,
    /// Open for booking.
    Published,
    /// Cancelled by the organiser.
    Cancelled,
    /// Published but with zero seats left. Computed, never set by hand.
    SoldOut,
}

impl EventStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::SoldOut => "sold_out",
        }
    }

    /// Parses the database / wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "cancelled" => Some(Self::Cancelled),
            "sold_out" => Some(Self::SoldOut),
            _ => None,
        }
    }

    /// Whether the booking flow may see this event at all.
    ///
    /// `sold_out` is visible so the orchestrator can serve waitlist joins;
    /// `draft` and `cancelled` read as absent.
    #[must_use]
    pub const fn is_bookable_surface(self) -> bool {
        matches!(self, Self::Published | Self::SoldOut)
    }
}

/// Event record as served to the booking orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventForBooking {
    /// Event identifier.
    pub event_id: Uuid,
    /// Human-readable event name.
    pub name: String,
    /// Seats currently available.
    pub available_seats: i32,
    /// Per-booking ticket cap declared by the organiser.
    pub max_tickets_per_booking: i32,
    /// Price per seat.
    pub base_price: f64,
    /// Optimistic-concurrency version of the inventory row.
    pub version: i32,
    /// Inventory status string (`published` or `sold_out` on this surface).
    pub status: String,
    /// Scheduled start; drives the refund tiers.
    pub starts_at: DateTime<Utc>,
}

/// Result of a successful inventory mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Event identifier.
    pub event_id: Uuid,
    /// Seats available after the mutation.
    pub available_seats: i32,
    /// Status after the mutation (`sold_out` is computed in the same write).
    pub status: String,
    /// Version after the mutation (previous + 1).
    pub version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            EventStatus::Draft,
            EventStatus::Published,
            EventStatus::Cancelled,
            EventStatus::SoldOut,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EventStatus::parse("archived"), None);
    }

    #[test]
    fn only_published_and_sold_out_are_visible() {
        assert!(EventStatus::Published.is_bookable_surface());
        assert!(EventStatus::SoldOut.is_bookable_surface());
        assert!(!EventStatus::Draft.is_bookable_surface());
        assert!(!EventStatus::Cancelled.is_bookable_surface());
    }
}
