//! REST endpoint handlers organized by resource.

pub mod bookings;
pub mod internal;
pub mod inventory;
pub mod system;
pub mod waitlist;

use axum::Router;

use crate::app_state::{BookingState, InventoryState};

/// Composes the booking orchestrator's `/api/v1` routes.
pub fn booking_routes() -> Router<BookingState> {
    Router::new()
        .merge(bookings::routes())
        .merge(waitlist::routes())
}

/// Composes the inventory service's internal routes.
pub fn inventory_routes() -> Router<InventoryState> {
    inventory::routes()
}
