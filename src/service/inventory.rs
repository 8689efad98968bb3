//! Inventory service logic: validation in front of the CAS store.

use uuid::Uuid;

use crate::domain::{EventForBooking, InventorySnapshot};
use crate::error::ApiError;
use crate::persistence::InventoryStore;

/// Orchestration layer for the inventory service's three operations.
#[derive(Debug, Clone)]
pub struct InventoryService {
    store: InventoryStore,
}

impl InventoryService {
    /// Creates a new `InventoryService`.
    #[must_use]
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Fetch-for-booking: the slice of an event the booking flow needs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for absent, draft, or cancelled
    /// events.
    pub async fn fetch_for_booking(&self, event_id: Uuid) -> Result<EventForBooking, ApiError> {
        self.store
            .fetch_for_booking(event_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound("event not found or not available for booking".to_string())
            })
    }

    /// Apply-delta: negative reserves, positive returns, version-guarded.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity or negative version as
    /// [`ApiError::InvalidInput`]; otherwise the store's conflict surface.
    pub async fn apply_delta(
        &self,
        event_id: Uuid,
        quantity: i32,
        version: i32,
    ) -> Result<InventorySnapshot, ApiError> {
        if quantity == 0 {
            return Err(ApiError::InvalidInput("quantity cannot be zero".to_string()));
        }
        if version < 0 {
            return Err(ApiError::InvalidInput(
                "version must be non-negative".to_string(),
            ));
        }

        let snapshot = self.store.apply_delta(event_id, quantity, version).await?;

        if quantity < 0 {
            tracing::info!(
                %event_id,
                seats_reserved = -quantity,
                remaining_seats = snapshot.available_seats,
                new_version = snapshot.version,
                "seats reserved"
            );
        } else {
            tracing::info!(
                %event_id,
                seats_returned = quantity,
                available_seats = snapshot.available_seats,
                new_version = snapshot.version,
                "seats returned"
            );
        }
        Ok(snapshot)
    }

    /// Return-seats: the dedicated positive-delta variant used on the
    /// cancel/expire paths.
    ///
    /// # Errors
    ///
    /// Rejects non-positive quantities as [`ApiError::InvalidInput`];
    /// otherwise the store's conflict surface.
    pub async fn return_seats(
        &self,
        event_id: Uuid,
        quantity: i32,
        version: i32,
    ) -> Result<InventorySnapshot, ApiError> {
        if quantity <= 0 {
            return Err(ApiError::InvalidInput(
                "quantity must be positive".to_string(),
            ));
        }
        self.apply_delta(event_id, quantity, version).await
    }
}
