//! Booking and payment store.
//!
//! Every lifecycle transition is a conditional `UPDATE` whose predicate
//! names the prior state (`WHERE status = 'pending' ...`), so when several
//! writers race (user confirm, user cancel, sweeper replicas) at most one
//! transition succeeds and the losers observe zero rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, Payment, PaymentStatus};
use crate::error::ApiError;

const BOOKING_COLUMNS: &str = "booking_id, user_id, event_id, booking_reference, quantity, \
     total_amount, status, payment_status, idempotency_key, expires_at, booked_at, confirmed_at";

type BookingRow = (
    Uuid,
    Uuid,
    Uuid,
    String,
    i32,
    f64,
    String,
    String,
    Option<String>,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

/// Parameters for inserting a fresh pending booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Owning user.
    pub user_id: Uuid,
    /// Booked event.
    pub event_id: Uuid,
    /// Generated short human code.
    pub booking_reference: String,
    /// Seats held.
    pub quantity: i32,
    /// `base_price × quantity`.
    pub total_amount: f64,
    /// Caller retry token.
    pub idempotency_key: String,
    /// Hold deadline.
    pub expires_at: DateTime<Utc>,
}

/// Store for the `bookings` and `payments` tables.
#[derive(Debug, Clone)]
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a `pending` booking row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure, including
    /// uniqueness violations on the reference or idempotency key.
    pub async fn create(&self, new: &NewBooking) -> Result<Booking, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings \
                 (booking_id, user_id, event_id, booking_reference, quantity, total_amount, \
                  status, payment_status, idempotency_key, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending', 'pending', $7, $8) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.event_id)
        .bind(&new.booking_reference)
        .bind(new.quantity)
        .bind(new.total_amount)
        .bind(&new.idempotency_key)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await?;

        map_booking(row)
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// Looks up a prior booking by idempotency key; this is what makes
    /// reserve retries safe.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn get_by_idempotency_key(&self, key: &str) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE idempotency_key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// `pending → confirmed`; stamps `confirmed_at` and completes the
    /// payment status in the same write. `None` if the booking was no
    /// longer pending.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn mark_confirmed(&self, booking_id: Uuid) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings \
             SET status = 'confirmed', payment_status = 'completed', confirmed_at = now() \
             WHERE booking_id = $1 AND status = 'pending' \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// Transitions to `cancelled`, predicated on the status the caller
    /// observed. `None` if the booking moved on in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn mark_cancelled(
        &self,
        booking_id: Uuid,
        observed: BookingStatus,
    ) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = 'cancelled' \
             WHERE booking_id = $1 AND status = $2 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .bind(observed.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// `pending → expired`, only when the deadline has actually passed.
    /// The deadline predicate makes concurrent sweeper replicas safe: at
    /// most one replica's update hits the row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn mark_expired_due(&self, booking_id: Uuid) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = 'expired' \
             WHERE booking_id = $1 AND status = 'pending' AND expires_at < now() \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// `pending → expired` regardless of the deadline, for manual expiry
    /// and the force-expire operational sweep.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn mark_expired(&self, booking_id: Uuid) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = 'expired' \
             WHERE booking_id = $1 AND status = 'pending' \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(map_booking).transpose()
    }

    /// Marks a completed payment as refunded after cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn mark_payment_refunded(&self, booking_id: Uuid) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE bookings SET payment_status = 'refunded' \
             WHERE booking_id = $1 AND payment_status = 'completed'",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Pending bookings whose deadline has passed, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn expired_batch(&self, limit: i64) -> Result<Vec<Booking>, ApiError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE status = 'pending' AND expires_at < now() \
             ORDER BY expires_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(map_booking).collect()
    }

    /// All pending bookings, oldest first, for the force-expire sweep.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn pending_batch(&self, limit: i64) -> Result<Vec<Booking>, ApiError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE status = 'pending' \
             ORDER BY booked_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(map_booking).collect()
    }

    /// A page of the user's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, ApiError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE user_id = $1 \
             ORDER BY booked_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(map_booking).collect()
    }

    /// Total bookings for the user, for pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, ApiError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // ── Payments ────────────────────────────────────────────────────────

    /// Inserts the payment row for a confirmed booking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_payment(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        event_id: Uuid,
        amount: f64,
        payment_method: &str,
        gateway_txn_id: &str,
        ticket_url: &str,
    ) -> Result<Payment, ApiError> {
        let row = sqlx::query_as::<_, (Uuid, Uuid, f64, String, String, Option<String>)>(
            "INSERT INTO payments \
                 (payment_id, booking_id, user_id, event_id, amount, currency, \
                  payment_method, payment_gateway, gateway_txn_id, status, ticket_url) \
             VALUES ($1, $2, $3, $4, $5, 'USD', $6, 'mock_gateway', $7, 'completed', $8) \
             RETURNING payment_id, booking_id, amount, status, gateway_txn_id, ticket_url",
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(user_id)
        .bind(event_id)
        .bind(amount)
        .bind(payment_method)
        .bind(gateway_txn_id)
        .bind(ticket_url)
        .fetch_one(&self.pool)
        .await?;

        let (payment_id, booking_id, amount, status, gateway_txn_id, ticket_url) = row;
        Ok(Payment {
            payment_id,
            booking_id,
            amount,
            status,
            gateway_txn_id,
            ticket_url,
        })
    }

    /// Fetches the payment attached to a booking, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on query failure.
    pub async fn payment_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Payment>, ApiError> {
        let row = sqlx::query_as::<_, (Uuid, Uuid, f64, String, String, Option<String>)>(
            "SELECT payment_id, booking_id, amount, status, gateway_txn_id, ticket_url \
             FROM payments WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(payment_id, booking_id, amount, status, gateway_txn_id, ticket_url)| Payment {
                payment_id,
                booking_id,
                amount,
                status,
                gateway_txn_id,
                ticket_url,
            },
        ))
    }

    /// Pings the database, for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] if the pool is unhealthy.
    pub async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn map_booking(row: BookingRow) -> Result<Booking, ApiError> {
    let (
        booking_id,
        user_id,
        event_id,
        booking_reference,
        quantity,
        total_amount,
        status,
        payment_status,
        idempotency_key,
        expires_at,
        booked_at,
        confirmed_at,
    ) = row;

    let status = BookingStatus::parse(&status)
        .ok_or_else(|| ApiError::Internal(format!("unknown booking status: {status}")))?;
    let payment_status = PaymentStatus::parse(&payment_status)
        .ok_or_else(|| ApiError::Internal(format!("unknown payment status: {payment_status}")))?;

    Ok(Booking {
        booking_id,
        user_id,
        event_id,
        booking_reference,
        quantity,
        total_amount,
        status,
        payment_status,
        idempotency_key,
        expires_at,
        booked_at,
        confirmed_at,
    })
}
