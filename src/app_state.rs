//! Shared application state injected into Axum handlers.

use std::sync::Arc;

use crate::auth::{InternalKeyProvider, JwtSecretProvider};
use crate::cache::RedisStore;
use crate::config::{BookingConfig, InventoryConfig};
use crate::service::{BookingService, InventoryService, WaitlistService};

/// State for the booking orchestrator's router.
#[derive(Debug, Clone)]
pub struct BookingState {
    /// Reservation state machine.
    pub bookings: Arc<BookingService>,
    /// Waitlist scheduler.
    pub waitlist: Arc<WaitlistService>,
    /// Ephemeral store handle, exposed for readiness checks.
    pub cache: RedisStore,
    /// Service configuration.
    pub config: Arc<BookingConfig>,
}

impl JwtSecretProvider for BookingState {
    fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}

impl InternalKeyProvider for BookingState {
    fn internal_api_key(&self) -> &str {
        &self.config.internal_api_key
    }
}

/// State for the inventory service's router.
#[derive(Debug, Clone)]
pub struct InventoryState {
    /// Seat-count owner.
    pub inventory: Arc<InventoryService>,
    /// Service configuration.
    pub config: Arc<InventoryConfig>,
}

impl InternalKeyProvider for InventoryState {
    fn internal_api_key(&self) -> &str {
        &self.config.internal_api_key
    }
}
