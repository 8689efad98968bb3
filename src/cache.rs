//! Redis-backed ephemeral state for the booking orchestrator.
//!
//! Four concerns share one connection manager, all built from single-key
//! atomic primitives:
//!
//! - **Reservation holds**: `SET` with TTL equal to the hold duration; the
//!   key vanishing is what makes a hold expire.
//! - **Rate limiting**: `INCR` + `EXPIRE` in an atomic pipeline, one
//!   counter per user per minute.
//! - **Availability cache**: short-TTL JSON snapshot of an event's
//!   availability payload.
//! - **Distributed lock**: `SET NX` with a holder token and a Lua
//!   compare-and-delete release. Not on the happy path; used to keep
//!   operational full sweeps from overlapping.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ReservationHold;
use crate::error::ApiError;

/// Lua compare-and-delete: release the lock only if we still hold it.
const UNLOCK_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Cached availability payload for an event.
///
/// The whole response is cached, not just the seat count, so cache hits
/// carry the same fields as a fresh inventory fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    /// Seats available at snapshot time.
    pub available_seats: i32,
    /// Per-booking ticket cap.
    pub max_per_booking: i32,
    /// Price per seat.
    pub base_price: f64,
}

/// Handle to the ephemeral store.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and builds the shared connection manager.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] if the URL is invalid or the initial
    /// connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, ApiError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Round-trips a `PING`, for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] if the server is unreachable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    // ── Reservation holds ───────────────────────────────────────────────

    /// Writes the reservation hold with TTL equal to the hold duration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure or
    /// [`ApiError::Internal`] if the payload cannot be serialized.
    pub async fn set_hold(
        &self,
        booking_id: Uuid,
        hold: &ReservationHold,
        ttl: Duration,
    ) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(hold)
            .map_err(|e| ApiError::Internal(format!("failed to serialize hold: {e}")))?;
        let _: () = conn
            .set_ex(hold_key(booking_id), payload, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    /// Fetches the reservation hold, `None` if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure. A present but
    /// undecodable value is treated as absent (and logged) rather than
    /// failing the request.
    pub async fn get_hold(&self, booking_id: Uuid) -> Result<Option<ReservationHold>, ApiError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(hold_key(booking_id)).await?;
        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(hold) => Some(hold),
            Err(e) => {
                tracing::warn!(%booking_id, error = %e, "discarding undecodable hold");
                None
            }
        }))
    }

    /// Deletes the reservation hold.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn delete_hold(&self, booking_id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(hold_key(booking_id)).await?;
        Ok(())
    }

    // ── Rate limiting ───────────────────────────────────────────────────

    /// Atomically increments the user's reserve counter and returns the
    /// post-increment value. The key expires after `window`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn incr_rate_limit(&self, user_id: Uuid, window: Duration) -> Result<i64, ApiError> {
        let mut conn = self.conn.clone();
        let key = rate_key(user_id);
        // INCR and EXPIRE must travel together, otherwise a crash between
        // them leaves a counter that never resets.
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .expire(&key, i64::try_from(window.as_secs().max(1)).unwrap_or(60))
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    // ── Availability cache ──────────────────────────────────────────────

    /// Caches the availability payload for an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn cache_availability(
        &self,
        event_id: Uuid,
        snapshot: &AvailabilitySnapshot,
        ttl: Duration,
    ) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(snapshot)
            .map_err(|e| ApiError::Internal(format!("failed to serialize availability: {e}")))?;
        let _: () = conn
            .set_ex(availability_key(event_id), payload, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    /// Fetches the cached availability payload, `None` on miss.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn cached_availability(
        &self,
        event_id: Uuid,
    ) -> Result<Option<AvailabilitySnapshot>, ApiError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(availability_key(event_id)).await?;
        Ok(raw.and_then(|json| serde_json::from_str(&json).ok()))
    }

    /// Drops the cached availability payload after an inventory mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn invalidate_availability(&self, event_id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(availability_key(event_id)).await?;
        Ok(())
    }

    // ── Distributed lock ────────────────────────────────────────────────

    /// Tries to take the named lock. Returns `false` when another holder
    /// has it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn acquire_lock(
        &self,
        name: &str,
        holder: &str,
        ttl: Duration,
    ) -> Result<bool, ApiError> {
        let mut conn = self.conn.clone();
        let acquired: Option<String> = redis::cmd("SET")
            .arg(lock_key(name))
            .arg(holder)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(acquired.is_some())
    }

    /// Releases the named lock if this holder still owns it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Redis`] on connection failure.
    pub async fn release_lock(&self, name: &str, holder: &str) -> Result<(), ApiError> {
        let mut conn = self.conn.clone();
        let _: i32 = redis::Script::new(UNLOCK_SCRIPT)
            .key(lock_key(name))
            .arg(holder)
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

fn hold_key(booking_id: Uuid) -> String {
    format!("booking:hold:{booking_id}")
}

fn rate_key(user_id: Uuid) -> String {
    format!("booking:rate:{user_id}")
}

fn availability_key(event_id: Uuid) -> String {
    format!("booking:availability:{event_id}")
}

fn lock_key(name: &str) -> String {
    format!("booking:lock:{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // The #[ignore]d tests require a running Redis instance:
    // docker run -d -p 6379:6379 redis:7-alpine

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    fn make_hold() -> ReservationHold {
        ReservationHold {
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            quantity: 2,
            amount: 150.0,
            booking_reference: "EVT-TEST01".to_string(),
            expires_at: Utc::now() + chrono::Duration::minutes(5),
        }
    }

    #[test]
    fn keys_are_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            hold_key(id),
            "booking:hold:00000000-0000-0000-0000-000000000000"
        );
        assert!(rate_key(id).starts_with("booking:rate:"));
        assert!(availability_key(id).starts_with("booking:availability:"));
        assert_eq!(lock_key("sweep"), "booking:lock:sweep");
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn hold_round_trip_and_delete() {
        let store = RedisStore::connect(REDIS_URL).await.expect("connect");
        let booking_id = Uuid::new_v4();
        let hold = make_hold();

        store
            .set_hold(booking_id, &hold, Duration::from_secs(30))
            .await
            .expect("set");
        let fetched = store.get_hold(booking_id).await.expect("get");
        assert_eq!(
            fetched.map(|h| h.booking_reference),
            Some(hold.booking_reference)
        );

        store.delete_hold(booking_id).await.expect("delete");
        assert!(store.get_hold(booking_id).await.expect("get").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn rate_counter_increments() {
        let store = RedisStore::connect(REDIS_URL).await.expect("connect");
        let user_id = Uuid::new_v4();

        let first = store
            .incr_rate_limit(user_id, Duration::from_secs(60))
            .await
            .expect("incr");
        let second = store
            .incr_rate_limit(user_id, Duration::from_secs(60))
            .await
            .expect("incr");
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn lock_excludes_second_holder() {
        let store = RedisStore::connect(REDIS_URL).await.expect("connect");
        let name = format!("test:{}", Uuid::new_v4());

        assert!(
            store
                .acquire_lock(&name, "a", Duration::from_secs(10))
                .await
                .expect("acquire")
        );
        assert!(
            !store
                .acquire_lock(&name, "b", Duration::from_secs(10))
                .await
                .expect("acquire")
        );

        // Wrong holder cannot release.
        store.release_lock(&name, "b").await.expect("release");
        assert!(
            !store
                .acquire_lock(&name, "b", Duration::from_secs(10))
                .await
                .expect("acquire")
        );

        store.release_lock(&name, "a").await.expect("release");
        assert!(
            store
                .acquire_lock(&name, "b", Duration::from_secs(10))
                .await
                .expect("acquire")
        );
        store.release_lock(&name, "b").await.expect("release");
    }
}
