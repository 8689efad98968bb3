//! Pure booking rules: refund tiers, reference format, wait estimates.

use chrono::{Duration, Utc};
use stagepass::domain::booking::{refund_amount, refund_status, RefundStatus};
use stagepass::domain::reference;
use stagepass::domain::waitlist::estimated_wait;

#[test]
fn refund_is_full_for_an_event_in_48_hours() {
    let now = Utc::now();
    let amount = refund_amount(300.0, now + Duration::hours(48), now);
    assert_eq!(amount, 300.0);
    assert_eq!(refund_status(amount), RefundStatus::Processed);
}

#[test]
fn refund_is_half_for_an_event_in_10_hours() {
    let now = Utc::now();
    assert_eq!(refund_amount(300.0, now + Duration::hours(10), now), 150.0);
}

#[test]
fn refund_is_zero_for_an_event_in_1_hour() {
    let now = Utc::now();
    let amount = refund_amount(300.0, now + Duration::hours(1), now);
    assert_eq!(amount, 0.0);
    assert_eq!(refund_status(amount), RefundStatus::None);
}

#[test]
fn refund_boundaries_sit_just_inside_the_tiers() {
    let now = Utc::now();
    // Exactly 24 h out is the 50 % tier, exactly 2 h out is the 0 % tier.
    assert_eq!(refund_amount(100.0, now + Duration::hours(24), now), 50.0);
    assert_eq!(refund_amount(100.0, now + Duration::hours(2), now), 0.0);
}

#[test]
fn booking_references_are_short_upper_alphanumeric_codes() {
    for _ in 0..100 {
        let code = reference::booking_reference();
        let suffix = code.strip_prefix("EVT-").expect("EVT- prefix");
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
            "unexpected character in {code}"
        );
    }
}

#[test]
fn ticket_urls_are_stable_per_reference() {
    assert_eq!(
        reference::ticket_url("EVT-9Z8Y7X"),
        "https://tickets.stagepass.dev/qr/EVT-9Z8Y7X"
    );
}

#[test]
fn wait_estimates_cover_every_position() {
    assert_eq!(estimated_wait(1), "Next in line");
    assert_eq!(estimated_wait(2), "5-15 minutes");
    assert_eq!(estimated_wait(6), "15-60 minutes");
    assert_eq!(estimated_wait(100), "More than 1 hour");
}
