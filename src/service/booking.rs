//! Booking orchestrator: the reservation state machine.
//!
//! Reserve is the critical path. Its ordering matters: every check that can
//! fail without side effects runs before the inventory decrement, and
//! everything after the decrement either completes or compensates by
//! returning the seats. The seat decrement itself is the only step that
//! contends: it is a CAS in the inventory service, and losers surface a
//! retryable 409 instead of blocking.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cache::{AvailabilitySnapshot, RedisStore};
use crate::clients::InventoryClient;
use crate::config::BookingConfig;
use crate::domain::{reference, Booking, BookingStatus, Payment, PaymentStatus, ReservationHold};
use crate::domain::booking::{refund_amount, refund_status, RefundStatus};
use crate::error::ApiError;
use crate::payment::MockGateway;
use crate::persistence::{BookingStore, NewBooking};
use crate::service::WaitlistService;

/// Rows per sweep batch.
const SWEEP_BATCH: i64 = 100;
/// Rows per force-expire batch.
const FORCE_BATCH: i64 = 1000;
/// Bounded retries when a seat return loses the CAS.
const RETURN_ATTEMPTS: u32 = 3;
/// Name of the lock that keeps operational full sweeps from overlapping.
const FORCE_EXPIRE_LOCK: &str = "force-expire";

/// Successful reservation payload.
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Booking id; the client confirms with this.
    pub reservation_id: Uuid,
    /// Short human code.
    pub booking_reference: String,
    /// Hold deadline.
    pub expires_at: DateTime<Utc>,
    /// Amount due on confirm.
    pub total_amount: f64,
}

/// Successful confirmation payload.
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// The confirmed booking.
    pub booking: Booking,
    /// The recorded payment.
    pub payment: Payment,
    /// QR ticket URL.
    pub ticket_url: String,
}

/// Cancellation payload with the tiered refund outcome.
#[derive(Debug, Clone)]
pub struct Cancellation {
    /// Refund classification.
    pub refund_status: RefundStatus,
    /// Refunded amount.
    pub refund_amount: f64,
}

/// Availability answer, cache-backed.
#[derive(Debug, Clone)]
pub struct Availability {
    /// Whether the requested quantity fits.
    pub available: bool,
    /// Seats available.
    pub available_seats: i32,
    /// Per-booking ticket cap.
    pub max_per_booking: i32,
    /// Price per seat.
    pub base_price: f64,
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Bookings transitioned to `expired` by this sweep.
    pub processed: usize,
    /// Bookings the batch query returned.
    pub total: usize,
    /// Lapsed offers moved back to `waiting`.
    pub offers_requeued: u32,
}

/// A booking joined with its event name and payment, for detail reads.
#[derive(Debug, Clone)]
pub struct BookingDetail {
    /// The booking row.
    pub booking: Booking,
    /// Event name, when the event is still visible.
    pub event_name: Option<String>,
    /// Payment, when one was recorded.
    pub payment: Option<Payment>,
}

/// Orchestration layer for the booking lifecycle.
///
/// Stateless coordinator over the stores and clients; safe to share across
/// handlers and the expiry worker.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: BookingStore,
    cache: RedisStore,
    inventory: InventoryClient,
    waitlist: Arc<WaitlistService>,
    gateway: MockGateway,
    config: Arc<BookingConfig>,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        store: BookingStore,
        cache: RedisStore,
        inventory: InventoryClient,
        waitlist: Arc<WaitlistService>,
        gateway: MockGateway,
        config: Arc<BookingConfig>,
    ) -> Self {
        Self {
            store,
            cache,
            inventory,
            waitlist,
            gateway,
            config,
        }
    }

    /// Returns a reference to the booking store.
    #[must_use]
    pub fn store(&self) -> &BookingStore {
        &self.store
    }

    /// Returns a reference to the waitlist scheduler.
    #[must_use]
    pub fn waitlist(&self) -> &Arc<WaitlistService> {
        &self.waitlist
    }

    // ── Check availability ──────────────────────────────────────────────

    /// Read-through availability check. Never mutates; serves from the
    /// short-TTL cache when possible.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] for a non-positive quantity.
    /// - [`ApiError::NotFound`] when the event is not bookable.
    pub async fn check_availability(
        &self,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<Availability, ApiError> {
        if quantity <= 0 {
            return Err(ApiError::InvalidInput("invalid quantity".to_string()));
        }

        if let Ok(Some(cached)) = self.cache.cached_availability(event_id).await {
            return Ok(Availability {
                available: cached.available_seats >= quantity,
                available_seats: cached.available_seats,
                max_per_booking: cached.max_per_booking,
                base_price: cached.base_price,
            });
        }

        let event = self.inventory.get_event_for_booking(event_id).await?;
        let snapshot = AvailabilitySnapshot {
            available_seats: event.available_seats,
            max_per_booking: event.max_tickets_per_booking,
            base_price: event.base_price,
        };
        if let Err(e) = self
            .cache
            .cache_availability(event_id, &snapshot, self.config.availability_cache_ttl)
            .await
        {
            tracing::warn!(%event_id, error = %e, "failed to cache availability");
        }

        Ok(Availability {
            available: event.available_seats >= quantity,
            available_seats: event.available_seats,
            max_per_booking: event.max_tickets_per_booking,
            base_price: event.base_price,
        })
    }

    // ── Reserve ─────────────────────────────────────────────────────────

    /// Reserves seats: the two-phase protocol's first half.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] for bad quantities or a missing
    ///   idempotency key.
    /// - [`ApiError::RateLimited`] past the per-minute budget.
    /// - [`ApiError::NotFound`] for an unbookable event.
    /// - [`ApiError::VersionConflict`] when the CAS lost (retryable).
    /// - [`ApiError::SoldOut`] when the seats are gone.
    /// - [`ApiError::Internal`] when a post-decrement step failed; seats
    ///   have been returned.
    pub async fn reserve(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        quantity: i32,
        idempotency_key: &str,
    ) -> Result<Reservation, ApiError> {
        if quantity <= 0 || quantity > self.config.max_tickets_per_user {
            return Err(ApiError::InvalidInput(format!(
                "quantity must be between 1 and {}",
                self.config.max_tickets_per_user
            )));
        }
        if idempotency_key.is_empty() {
            return Err(ApiError::InvalidInput(
                "idempotency_key is required".to_string(),
            ));
        }

        // Rate limit before any downstream work. A Redis outage fails
        // open: the reserve will hit Redis again at the hold write, where
        // failure compensates properly.
        match self
            .cache
            .incr_rate_limit(user_id, Duration::from_secs(60))
            .await
        {
            Ok(count) if count > self.config.rate_limit_per_minute => {
                return Err(ApiError::RateLimited);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%user_id, error = %e, "rate limit check failed"),
        }

        // Idempotency: a replay returns the original reservation without
        // touching inventory again.
        if let Some(existing) = self.store.get_by_idempotency_key(idempotency_key).await? {
            tracing::info!(
                idempotency_key,
                booking_id = %existing.booking_id,
                "idempotent reserve replay"
            );
            return Ok(Reservation {
                reservation_id: existing.booking_id,
                expires_at: existing.expires_at.unwrap_or(existing.booked_at),
                booking_reference: existing.booking_reference,
                total_amount: existing.total_amount,
            });
        }

        let event = self.inventory.get_event_for_booking(event_id).await?;
        if quantity > event.max_tickets_per_booking {
            return Err(ApiError::InvalidInput(format!(
                "maximum {} tickets allowed per booking for this event",
                event.max_tickets_per_booking
            )));
        }

        // A waitlisted user reserving inside their offer window inherits
        // the offer deadline, so re-reserving cannot stretch the grace.
        let now = Utc::now();
        let offer_deadline = self
            .waitlist
            .active_entry(event_id, user_id)
            .await?
            .filter(|entry| entry.has_live_offer(now))
            .and_then(|entry| entry.expires_at);
        let expires_at = offer_deadline
            .unwrap_or_else(|| now + chrono::Duration::from_std(self.config.reservation_expiry)
                .unwrap_or_else(|_| chrono::Duration::minutes(5)));

        let snapshot = self
            .inventory
            .update_availability(event_id, -quantity, event.version)
            .await?;

        // Past this point every failure must give the seats back.
        let total_amount = event.base_price * f64::from(quantity);
        let new_booking = NewBooking {
            user_id,
            event_id,
            booking_reference: reference::booking_reference(),
            quantity,
            total_amount,
            idempotency_key: idempotency_key.to_string(),
            expires_at,
        };

        let booking = match self.store.create(&new_booking).await {
            Ok(booking) => booking,
            Err(e) => {
                tracing::error!(error = %e, %event_id, "failed to persist booking, compensating");
                self.compensate_reservation(event_id, quantity, snapshot.version, None)
                    .await;
                return Err(ApiError::Internal("failed to create booking".to_string()));
            }
        };

        let hold = ReservationHold {
            user_id,
            event_id,
            quantity,
            amount: total_amount,
            booking_reference: booking.booking_reference.clone(),
            expires_at,
        };
        let ttl = (expires_at - now)
            .to_std()
            .unwrap_or(self.config.reservation_expiry);
        if let Err(e) = self.cache.set_hold(booking.booking_id, &hold, ttl).await {
            tracing::error!(
                error = %e,
                booking_id = %booking.booking_id,
                "failed to write hold, compensating"
            );
            self.compensate_reservation(event_id, quantity, snapshot.version, Some(booking.booking_id))
                .await;
            return Err(ApiError::Internal(
                "failed to store reservation".to_string(),
            ));
        }

        if let Err(e) = self.cache.invalidate_availability(event_id).await {
            tracing::warn!(%event_id, error = %e, "failed to invalidate availability cache");
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            %user_id,
            %event_id,
            quantity,
            %expires_at,
            "seats reserved"
        );

        Ok(Reservation {
            reservation_id: booking.booking_id,
            booking_reference: booking.booking_reference,
            expires_at,
            total_amount,
        })
    }

    /// Undoes a reservation whose post-decrement step failed: cancels the
    /// orphan row (so the sweeper cannot return the seats a second time)
    /// and gives the seats back. Best-effort; failures are logged, and a
    /// surviving pending row is reconciled by the sweeper.
    async fn compensate_reservation(
        &self,
        event_id: Uuid,
        quantity: i32,
        version_after_decrement: i32,
        booking_id: Option<Uuid>,
    ) {
        if let Some(booking_id) = booking_id {
            match self.store.mark_cancelled(booking_id, BookingStatus::Pending).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    // Someone else already transitioned it; leave the seats
                    // to whichever path owns the row now.
                    tracing::warn!(%booking_id, "compensation found booking already transitioned");
                    return;
                }
                Err(e) => {
                    tracing::error!(%booking_id, error = %e, "compensation failed to cancel booking");
                    return;
                }
            }
        }

        if let Err(e) = self
            .inventory
            .return_seats(event_id, quantity, version_after_decrement)
            .await
        {
            // The CAS may have moved on; retry against the fresh version.
            tracing::warn!(%event_id, error = %e, "direct compensation failed, retrying");
            if let Err(e) = self.return_seats_with_retry(event_id, quantity).await {
                tracing::error!(%event_id, error = %e, "failed to return seats during compensation");
            }
        }
    }

    // ── Confirm ─────────────────────────────────────────────────────────

    /// Confirms a reservation: the two-phase protocol's second half.
    ///
    /// # Errors
    ///
    /// - [`ApiError::HoldExpired`] when the hold is gone.
    /// - [`ApiError::Forbidden`] when the caller does not own it.
    /// - [`ApiError::InvalidState`] when the booking is not pending.
    /// - [`ApiError::Internal`] when the gateway declined; the booking
    ///   stays pending for a retry within the hold window.
    pub async fn confirm(
        &self,
        user_id: Uuid,
        reservation_id: Uuid,
        payment_token: &str,
        payment_method: &str,
    ) -> Result<Confirmation, ApiError> {
        let hold = self
            .cache
            .get_hold(reservation_id)
            .await?
            .ok_or(ApiError::HoldExpired)?;

        if hold.user_id != user_id {
            return Err(ApiError::Forbidden(
                "reservation does not belong to authenticated user".to_string(),
            ));
        }

        let booking = self
            .store
            .get(reservation_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("booking not found".to_string()))?;
        if booking.status != BookingStatus::Pending {
            return Err(ApiError::InvalidState(
                "booking is not in pending state".to_string(),
            ));
        }

        let txn_id = self
            .gateway
            .charge(payment_token, booking.total_amount)
            .await?;
        let ticket_url = reference::ticket_url(&booking.booking_reference);

        let payment = self
            .store
            .insert_payment(
                booking.booking_id,
                user_id,
                booking.event_id,
                booking.total_amount,
                payment_method,
                &txn_id,
                &ticket_url,
            )
            .await?;

        let confirmed = self
            .store
            .mark_confirmed(booking.booking_id)
            .await?
            .ok_or_else(|| {
                ApiError::InvalidState("booking is not in pending state".to_string())
            })?;

        if let Err(e) = self.cache.delete_hold(reservation_id).await {
            tracing::warn!(%reservation_id, error = %e, "failed to delete hold");
        }
        if let Err(e) = self.cache.invalidate_availability(booking.event_id).await {
            tracing::warn!(event_id = %booking.event_id, error = %e, "failed to invalidate availability cache");
        }

        if let Err(e) = self.waitlist.convert_offer(booking.event_id, user_id).await {
            tracing::error!(%user_id, error = %e, "failed to convert waitlist offer");
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            %user_id,
            event_id = %booking.event_id,
            payment_id = %payment.payment_id,
            "booking confirmed"
        );

        Ok(Confirmation {
            booking: confirmed,
            payment,
            ticket_url,
        })
    }

    // ── Cancel ──────────────────────────────────────────────────────────

    /// Cancels a booking with the tiered refund policy. A cancelled
    /// confirmed booking returns its seats and wakes the waitlist.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] when the caller does not own it.
    /// - [`ApiError::InvalidState`] when already terminal.
    pub async fn cancel(&self, user_id: Uuid, booking_id: Uuid) -> Result<Cancellation, ApiError> {
        let booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("booking not found".to_string()))?;
        if booking.user_id != user_id {
            return Err(ApiError::Forbidden("access denied".to_string()));
        }
        match booking.status {
            BookingStatus::Cancelled => {
                return Err(ApiError::InvalidState(
                    "booking is already cancelled".to_string(),
                ));
            }
            BookingStatus::Expired => {
                return Err(ApiError::InvalidState(
                    "cannot cancel expired booking".to_string(),
                ));
            }
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }

        // The refund tiers key off the event start; only money actually
        // captured can come back.
        let event = self.inventory.get_event_for_booking(booking.event_id).await;
        let refund = match (&event, booking.payment_status) {
            (Ok(event), PaymentStatus::Completed) => {
                refund_amount(booking.total_amount, event.starts_at, Utc::now())
            }
            _ => 0.0,
        };

        let observed = booking.status;
        if self
            .store
            .mark_cancelled(booking_id, observed)
            .await?
            .is_none()
        {
            return Err(ApiError::InvalidState(
                "booking changed state, please retry".to_string(),
            ));
        }

        if observed == BookingStatus::Confirmed {
            if let Err(e) = self
                .return_seats_with_retry(booking.event_id, booking.quantity)
                .await
            {
                tracing::error!(%booking_id, error = %e, "failed to return seats on cancel");
            }
            if let Err(e) = self
                .waitlist
                .offer_cycle(booking.event_id, booking.quantity)
                .await
            {
                tracing::error!(event_id = %booking.event_id, error = %e, "offer cycle failed");
            }
        }

        if refund > 0.0 {
            self.store.mark_payment_refunded(booking_id).await?;
        }

        if let Err(e) = self.cache.delete_hold(booking_id).await {
            tracing::warn!(%booking_id, error = %e, "failed to delete hold");
        }
        if let Err(e) = self.cache.invalidate_availability(booking.event_id).await {
            tracing::warn!(event_id = %booking.event_id, error = %e, "failed to invalidate availability cache");
        }

        tracing::info!(%booking_id, %user_id, refund_amount = refund, "booking cancelled");

        Ok(Cancellation {
            refund_status: refund_status(refund),
            refund_amount: refund,
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Ownership-checked booking detail, joined with the event name.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] / [`ApiError::Forbidden`] per ownership.
    pub async fn get_booking(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingDetail, ApiError> {
        let booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("booking not found".to_string()))?;
        if booking.user_id != user_id {
            return Err(ApiError::Forbidden("access denied".to_string()));
        }
        self.detail(booking).await
    }

    /// Unchecked booking detail for the internal surface.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an absent booking.
    pub async fn get_booking_internal(&self, booking_id: Uuid) -> Result<BookingDetail, ApiError> {
        let booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("booking not found".to_string()))?;
        self.detail(booking).await
    }

    async fn detail(&self, booking: Booking) -> Result<BookingDetail, ApiError> {
        let event_name = match self.inventory.get_event_for_booking(booking.event_id).await {
            Ok(event) => Some(event.name),
            Err(ApiError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let payment = self.store.payment_for_booking(booking.booking_id).await?;
        Ok(BookingDetail {
            booking,
            event_name,
            payment,
        })
    }

    /// A page of the user's bookings plus the total count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn list_bookings(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), ApiError> {
        let bookings = self.store.list_for_user(user_id, limit, offset).await?;
        let total = self.store.count_for_user(user_id).await?;
        Ok((bookings, total))
    }

    // ── Expiry ──────────────────────────────────────────────────────────

    /// Lets a user expire their own pending booking early.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] when the caller does not own it.
    /// - [`ApiError::InvalidState`] unless pending.
    pub async fn manual_expire(&self, user_id: Uuid, booking_id: Uuid) -> Result<(), ApiError> {
        let booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("booking not found".to_string()))?;
        if booking.user_id != user_id {
            return Err(ApiError::Forbidden("access denied".to_string()));
        }
        if booking.status != BookingStatus::Pending {
            return Err(ApiError::InvalidState(
                "only pending bookings can be manually expired".to_string(),
            ));
        }

        if !self.expire_booking(&booking, false).await? {
            return Err(ApiError::InvalidState(
                "only pending bookings can be manually expired".to_string(),
            ));
        }
        tracing::info!(%booking_id, %user_id, "booking manually expired");
        Ok(())
    }

    /// One sweep: expired pending bookings first, lapsed offers second, so
    /// seats freed in this tick can be offered to the reordered queue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] if a batch query fails; individual
    /// booking failures are logged and skipped.
    pub async fn run_sweep(&self) -> Result<SweepReport, ApiError> {
        let batch = self.store.expired_batch(SWEEP_BATCH).await?;
        let total = batch.len();
        let mut processed = 0;

        for booking in &batch {
            match self.expire_booking(booking, true).await {
                Ok(true) => processed += 1,
                // A concurrent replica won the conditional update.
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(booking_id = %booking.booking_id, error = %e, "failed to expire booking");
                }
            }
        }

        let offers_requeued = self.waitlist.sweep_expired_offers(SWEEP_BATCH).await?;

        if processed > 0 || offers_requeued > 0 {
            tracing::info!(processed, total, offers_requeued, "expiry sweep completed");
        }
        Ok(SweepReport {
            processed,
            total,
            offers_requeued,
        })
    }

    /// Operational tool: expires every currently-pending booking no matter
    /// the deadline and reconciles inventory and the waitlist. Guarded by
    /// a Redis lock so two operators cannot run overlapping full sweeps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidState`] when a sweep is already running.
    pub async fn force_expire_all(&self) -> Result<SweepReport, ApiError> {
        let holder = Uuid::new_v4().to_string();
        if !self
            .cache
            .acquire_lock(FORCE_EXPIRE_LOCK, &holder, Duration::from_secs(60))
            .await?
        {
            return Err(ApiError::InvalidState(
                "a full expiry sweep is already running".to_string(),
            ));
        }

        let result = self.force_expire_inner().await;

        if let Err(e) = self.cache.release_lock(FORCE_EXPIRE_LOCK, &holder).await {
            tracing::warn!(error = %e, "failed to release force-expire lock");
        }
        result
    }

    async fn force_expire_inner(&self) -> Result<SweepReport, ApiError> {
        let batch = self.store.pending_batch(FORCE_BATCH).await?;
        let total = batch.len();
        let mut processed = 0;

        for booking in &batch {
            match self.expire_booking(booking, false).await {
                Ok(true) => processed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(booking_id = %booking.booking_id, error = %e, "failed to force-expire booking");
                }
            }
        }

        let offers_requeued = self.waitlist.sweep_expired_offers(SWEEP_BATCH).await?;

        tracing::info!(processed, total, offers_requeued, "force expiry completed");
        Ok(SweepReport {
            processed,
            total,
            offers_requeued,
        })
    }

    /// Expires one booking and reconciles everything that hangs off it.
    /// Returns `false` when the conditional transition no-opped (another
    /// writer got there first).
    async fn expire_booking(&self, booking: &Booking, due_only: bool) -> Result<bool, ApiError> {
        let transitioned = if due_only {
            self.store.mark_expired_due(booking.booking_id).await?
        } else {
            self.store.mark_expired(booking.booking_id).await?
        };
        if transitioned.is_none() {
            return Ok(false);
        }

        if let Err(e) = self
            .return_seats_with_retry(booking.event_id, booking.quantity)
            .await
        {
            tracing::error!(
                booking_id = %booking.booking_id,
                event_id = %booking.event_id,
                error = %e,
                "failed to return seats for expired booking"
            );
        }

        if let Err(e) = self.cache.delete_hold(booking.booking_id).await {
            tracing::warn!(booking_id = %booking.booking_id, error = %e, "failed to delete hold");
        }
        if let Err(e) = self.cache.invalidate_availability(booking.event_id).await {
            tracing::warn!(event_id = %booking.event_id, error = %e, "failed to invalidate availability cache");
        }

        if let Err(e) = self
            .waitlist
            .offer_cycle(booking.event_id, booking.quantity)
            .await
        {
            tracing::error!(event_id = %booking.event_id, error = %e, "offer cycle failed");
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            event_id = %booking.event_id,
            quantity = booking.quantity,
            "expired booking processed"
        );
        Ok(true)
    }

    /// Returns seats with a fresh version fetch per attempt, bounded
    /// retries on CAS loss.
    async fn return_seats_with_retry(&self, event_id: Uuid, quantity: i32) -> Result<(), ApiError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let event = self.inventory.get_event_for_booking(event_id).await?;
            match self
                .inventory
                .return_seats(event_id, quantity, event.version)
                .await
            {
                Ok(_) => return Ok(()),
                Err(ApiError::VersionConflict) if attempt < RETURN_ATTEMPTS => {}
                Err(e) => return Err(e),
            }
        }
    }
}
