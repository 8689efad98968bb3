//! Waitlist entry types and the human wait estimate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Waitlist entry status.
///
/// `waiting` and `offered` are the non-terminal states and take part in the
/// gap-free position numbering; the rest are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistStatus {
    /// In the queue, ordered by position.
    Waiting,
    /// Holds a time-bounded invitation to reserve.
    Offered,
    /// The offered user confirmed a booking.
    Converted,
    /// Kept for history after the event closed the entry out.
    Expired,
    /// The user left the queue.
    Removed,
}

impl WaitlistStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Offered => "offered",
            Self::Converted => "converted",
            Self::Expired => "expired",
            Self::Removed => "removed",
        }
    }

    /// Parses the database / wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(Self::Waiting),
            "offered" => Some(Self::Offered),
            "converted" => Some(Self::Converted),
            "expired" => Some(Self::Expired),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }

    /// Whether the entry still occupies a queue position.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Waiting | Self::Offered)
    }
}

/// A waitlist row.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    /// Primary key.
    pub waitlist_id: Uuid,
    /// Queued event.
    pub event_id: Uuid,
    /// Queued user; at most one active entry per (event, user).
    pub user_id: Uuid,
    /// Seats the user wants.
    pub quantity_requested: i32,
    /// 1-based queue position, gap-free across active entries.
    pub position: i32,
    /// Entry status.
    pub status: WaitlistStatus,
    /// When the offer was made, while offered.
    pub offered_at: Option<DateTime<Utc>>,
    /// Offer claim deadline, while offered.
    pub expires_at: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    /// Whether this entry currently holds a live offer.
    #[must_use]
    pub fn has_live_offer(&self, now: DateTime<Utc>) -> bool {
        self.status == WaitlistStatus::Offered
            && self.expires_at.is_some_and(|deadline| deadline > now)
    }
}

/// Coarse human-readable wait estimate shown with a queue position.
#[must_use]
pub fn estimated_wait(position: i32) -> &'static str {
    if position <= 1 {
        "Next in line"
    } else if position <= 5 {
        "5-15 minutes"
    } else if position <= 20 {
        "15-60 minutes"
    } else {
        "More than 1 hour"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            WaitlistStatus::Waiting,
            WaitlistStatus::Offered,
            WaitlistStatus::Converted,
            WaitlistStatus::Expired,
            WaitlistStatus::Removed,
        ] {
            assert_eq!(WaitlistStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn only_waiting_and_offered_are_active() {
        assert!(WaitlistStatus::Waiting.is_active());
        assert!(WaitlistStatus::Offered.is_active());
        assert!(!WaitlistStatus::Converted.is_active());
        assert!(!WaitlistStatus::Removed.is_active());
    }

    #[test]
    fn wait_estimate_buckets() {
        assert_eq!(estimated_wait(1), "Next in line");
        assert_eq!(estimated_wait(5), "5-15 minutes");
        assert_eq!(estimated_wait(20), "15-60 minutes");
        assert_eq!(estimated_wait(21), "More than 1 hour");
    }

    #[test]
    fn live_offer_requires_future_deadline() {
        let now = Utc::now();
        let entry = WaitlistEntry {
            waitlist_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            quantity_requested: 2,
            position: 1,
            status: WaitlistStatus::Offered,
            offered_at: Some(now),
            expires_at: Some(now + chrono::Duration::minutes(2)),
        };
        assert!(entry.has_live_offer(now));

        let lapsed = WaitlistEntry {
            expires_at: Some(now - chrono::Duration::seconds(1)),
            ..entry
        };
        assert!(!lapsed.has_live_offer(now));
    }
}
