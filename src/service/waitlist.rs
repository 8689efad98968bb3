//! Waitlist scheduler: join/leave/position plus the offer cycle that runs
//! whenever seats come back.
//!
//! Offers do not hold seats in inventory. An offered user still has to win
//! the reserve race; the offer only bounds the window in which their
//! reservation deadline is clamped (see the booking service).

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::clients::InventoryClient;
use crate::domain::{WaitlistEntry, WaitlistStatus};
use crate::error::ApiError;
use crate::persistence::WaitlistStore;

/// Orchestration layer for the per-event waitlist queues.
#[derive(Debug, Clone)]
pub struct WaitlistService {
    store: WaitlistStore,
    inventory: InventoryClient,
    offer_duration: Duration,
}

impl WaitlistService {
    /// Creates a new `WaitlistService`.
    #[must_use]
    pub fn new(store: WaitlistStore, inventory: InventoryClient, offer_duration: Duration) -> Self {
        Self {
            store,
            inventory,
            offer_duration,
        }
    }

    /// The user's active entry for an event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn active_entry(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<WaitlistEntry>, ApiError> {
        self.store.active_entry(event_id, user_id).await
    }

    /// Joins the queue for an event.
    ///
    /// Idempotent: a user who already has an active entry gets that entry
    /// back. Rejected when the event currently has enough seats for the
    /// request, in which case the user should book directly.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] for a non-positive quantity or when
    ///   seats are available.
    /// - [`ApiError::NotFound`] for an unknown event.
    pub async fn join(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<WaitlistEntry, ApiError> {
        if quantity <= 0 {
            return Err(ApiError::InvalidInput(
                "quantity must be positive".to_string(),
            ));
        }

        if let Some(existing) = self.store.active_entry(event_id, user_id).await? {
            return Ok(existing);
        }

        let event = self.inventory.get_event_for_booking(event_id).await?;
        if event.available_seats >= quantity {
            return Err(ApiError::InvalidInput(
                "seats are available, please book directly".to_string(),
            ));
        }

        let entry = self.store.join(event_id, user_id, quantity).await?;
        tracing::info!(
            %user_id,
            %event_id,
            position = entry.position,
            quantity,
            "user joined waitlist"
        );
        Ok(entry)
    }

    /// The user's position plus the event's waiting headcount.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the user has no active entry.
    pub async fn position(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<(WaitlistEntry, i64), ApiError> {
        let entry = self
            .store
            .active_entry(event_id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("not in waitlist for this event".to_string()))?;
        let (waiting, _active) = self.store.stats(event_id).await?;
        Ok((entry, waiting))
    }

    /// Removes the user from the queue; entries behind them move up.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the user has no active entry.
    pub async fn leave(&self, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        let entry = self
            .store
            .active_entry(event_id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("not in waitlist for this event".to_string()))?;

        self.store
            .finalize(entry.waitlist_id, WaitlistStatus::Removed)
            .await?;
        tracing::info!(%user_id, %event_id, position = entry.position, "user left waitlist");
        Ok(())
    }

    /// Flips the user's `offered` entry to `converted` after a successful
    /// confirmation. A no-op when they had none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn convert_offer(&self, event_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let Some(entry) = self.store.active_entry(event_id, user_id).await? else {
            return Ok(());
        };
        if entry.status != WaitlistStatus::Offered {
            return Ok(());
        }
        self.store
            .finalize(entry.waitlist_id, WaitlistStatus::Converted)
            .await?;
        tracing::info!(%user_id, %event_id, "waitlist offer converted to booking");
        Ok(())
    }

    /// Offer cycle: walks the front of the queue and invites entries to
    /// claim the `released` seats within the configured window.
    ///
    /// Returns the number of entries offered. A concurrent cycle racing on
    /// the same entries degrades to no-ops, never to duplicate offers.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn offer_cycle(&self, event_id: Uuid, released: i32) -> Result<u32, ApiError> {
        if released <= 0 {
            return Ok(0);
        }

        let candidates = self
            .store
            .next_waiting(event_id, i64::from(released) * 2)
            .await?;
        if candidates.is_empty() {
            return Ok(0);
        }

        let requests: Vec<i32> = candidates.iter().map(|c| c.quantity_requested).collect();
        let mut remaining = released;
        let mut admitted = 0_u32;
        for index in admission_plan(&requests, released) {
            let entry = &candidates[index];
            let granted = entry.quantity_requested.min(remaining);
            let expires_at = Utc::now()
                + chrono::Duration::from_std(self.offer_duration)
                    .unwrap_or_else(|_| chrono::Duration::minutes(2));

            if self.store.offer(entry.waitlist_id, expires_at).await? {
                remaining -= granted;
                admitted += 1;
                tracing::info!(
                    user_id = %entry.user_id,
                    %event_id,
                    position = entry.position,
                    seats_offered = granted,
                    %expires_at,
                    "waitlist offer created"
                );
            }
        }
        Ok(admitted)
    }

    /// Moves every lapsed offer back to `waiting` at the end of the queue.
    /// Returns the number of entries requeued.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn sweep_expired_offers(&self, limit: i64) -> Result<u32, ApiError> {
        let lapsed = self.store.expired_offers(limit).await?;
        let mut requeued = 0_u32;
        for offer in lapsed {
            if self.store.requeue_lapsed(offer.waitlist_id).await? {
                requeued += 1;
                tracing::info!(
                    user_id = %offer.user_id,
                    event_id = %offer.event_id,
                    old_position = offer.position,
                    "waitlist offer expired, user moved to end of queue"
                );
            }
        }
        Ok(requeued)
    }
}

/// Decides which queue entries an offer cycle admits.
///
/// `requests` is the front of the queue in position order; `released` is
/// the number of seats to hand out. The head-of-line entry is always
/// admitted, even when it wants more than was released (it is offered only
/// what there is). Every later entry is admitted only if its full request
/// fits the remainder.
#[must_use]
pub fn admission_plan(requests: &[i32], released: i32) -> Vec<usize> {
    let mut remaining = released;
    let mut admitted = Vec::new();
    for (index, &requested) in requests.iter().enumerate() {
        if remaining <= 0 {
            break;
        }
        if requested <= remaining || admitted.is_empty() {
            admitted.push(index);
            remaining -= requested.min(remaining);
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_of_line_is_admitted_even_when_oversized() {
        // Head wants 5, only 2 released: it gets the 2 and the cycle ends.
        assert_eq!(admission_plan(&[5, 1], 2), vec![0]);
    }

    #[test]
    fn later_entries_must_fit_exactly() {
        // 3 released: head takes 2, second wants 2 and is skipped, third
        // wants 1 and fits.
        assert_eq!(admission_plan(&[2, 2, 1], 3), vec![0, 2]);
    }

    #[test]
    fn exact_fill_stops_the_walk() {
        assert_eq!(admission_plan(&[2, 1, 1], 3), vec![0, 1]);
    }

    #[test]
    fn empty_queue_admits_nobody() {
        assert!(admission_plan(&[], 4).is_empty());
    }

    #[test]
    fn zero_release_admits_nobody() {
        assert!(admission_plan(&[1, 1], 0).is_empty());
    }

    #[test]
    fn fifo_order_is_preserved() {
        assert_eq!(admission_plan(&[1, 1, 1, 1], 3), vec![0, 1, 2]);
    }
}
