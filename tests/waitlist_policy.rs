//! Offer-cycle admission policy.
//!
//! The policy under test: the head-of-line entry is always admitted, even
//! when it asks for more than was released (it is offered what there is);
//! every later entry is admitted only if its full request fits what
//! remains.

use stagepass::service::waitlist::admission_plan;

#[test]
fn single_seat_goes_to_the_head() {
    assert_eq!(admission_plan(&[1, 1, 1], 1), vec![0]);
}

#[test]
fn oversized_head_is_not_skipped() {
    // Two seats released after a cancellation; the head wants four. The
    // head still gets the offer (for the two that exist) and blocks nobody
    // behind it from a seat that no longer exists.
    assert_eq!(admission_plan(&[4, 1], 2), vec![0]);
}

#[test]
fn remainder_flows_past_oversized_middle_entries() {
    // Head takes 1 of 4, second wants 5 and is skipped, third takes 2,
    // fourth takes the last 1.
    assert_eq!(admission_plan(&[1, 5, 2, 1], 4), vec![0, 2, 3]);
}

#[test]
fn walk_is_strictly_fifo() {
    let admitted = admission_plan(&[1, 1, 1, 1, 1], 3);
    assert_eq!(admitted, vec![0, 1, 2]);
}

#[test]
fn nothing_released_nothing_offered() {
    assert!(admission_plan(&[2, 3], 0).is_empty());
    assert!(admission_plan(&[2, 3], -1).is_empty());
}

#[test]
fn empty_queue_is_a_no_op() {
    assert!(admission_plan(&[], 5).is_empty());
}

#[test]
fn released_seats_are_never_over_allocated() {
    // Sum of granted seats never exceeds the release, with the head
    // clamped to what remains.
    for released in 1..=6 {
        let requests = [3, 2, 2, 1, 1];
        let admitted = admission_plan(&requests, released);
        let granted: i32 = admitted
            .iter()
            .scan(released, |remaining, &index| {
                let granted = requests[index].min(*remaining);
                *remaining -= granted;
                Some(granted)
            })
            .sum();
        assert!(
            granted <= released,
            "released {released}: granted {granted}"
        );
    }
}
