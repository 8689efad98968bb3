//! REST API layer: route handlers, DTOs, and router composition.
//!
//! End-user endpoints are mounted under `/api/v1`; internal
//! service-to-service endpoints live under `/internal`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::app_state::{BookingState, InventoryState};

/// OpenAPI documentation for the stagepass REST surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "stagepass",
        version = "0.1.0",
        description = "Seat-reservation engine: optimistic inventory control, two-phase booking with bounded holds, and waitlist scheduling.",
        license(name = "MIT"),
    ),
    tags(
        (name = "System", description = "Health and readiness"),
        (name = "Bookings", description = "Reservation state machine"),
        (name = "Waitlist", description = "Per-event waitlist queues"),
        (name = "Internal", description = "Service-to-service booking surface"),
        (name = "Inventory", description = "Authoritative seat counts"),
    ),
    paths(
        handlers::system::health,
        handlers::bookings::check_availability,
        handlers::bookings::reserve,
        handlers::bookings::confirm,
        handlers::bookings::get_booking,
        handlers::bookings::cancel_booking,
        handlers::bookings::expire_booking,
        handlers::bookings::list_bookings,
        handlers::waitlist::join,
        handlers::waitlist::position,
        handlers::waitlist::leave,
        handlers::internal::get_booking_internal,
        handlers::internal::expire_reservations,
        handlers::internal::force_expire_all,
        handlers::inventory::get_event_for_booking,
        handlers::inventory::update_availability,
        handlers::inventory::return_seats,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        dto::CheckAvailabilityResponse,
        dto::ReserveRequest,
        dto::ReservationResponse,
        dto::ConfirmRequest,
        dto::ConfirmationResponse,
        dto::PaymentInfoDto,
        dto::BookingDetailResponse,
        dto::BookingSummaryDto,
        dto::BookingListResponse,
        dto::CancellationResponse,
        dto::MessageResponse,
        dto::JoinWaitlistRequest,
        dto::JoinWaitlistResponse,
        dto::WaitlistPositionResponse,
        dto::LeaveWaitlistRequest,
        dto::UpdateAvailabilityRequest,
    )),
    modifiers(&SecurityAddon)
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Registers the two auth schemes the endpoints reference.
#[derive(Debug)]
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// Builds the booking orchestrator's complete router.
pub fn booking_router() -> Router<BookingState> {
    Router::new()
        .nest("/api/v1", handlers::booking_routes())
        .merge(handlers::internal::routes())
        .merge(handlers::system::booking_routes())
}

/// Builds the inventory service's complete router.
pub fn inventory_router() -> Router<InventoryState> {
    Router::new()
        .merge(handlers::inventory_routes())
        .merge(handlers::system::inventory_routes())
}
