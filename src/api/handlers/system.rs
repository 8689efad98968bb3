//! System endpoints: liveness and readiness for both services.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::{BookingState, InventoryState};
use crate::error::ApiError;

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Readiness response naming each dependency.
#[derive(Debug, Serialize, ToSchema)]
struct ReadinessResponse {
    status: String,
    database: String,
    redis: String,
}

/// `GET /health` — Process is up.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /health/ready` — Booking service dependencies are reachable.
///
/// # Errors
///
/// Returns 503 [`ApiError::DependencyUnavailable`] naming the failing
/// dependency.
pub async fn booking_readiness(
    State(state): State<BookingState>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .bookings
        .store()
        .ping()
        .await
        .map_err(|_| ApiError::DependencyUnavailable("database not ready".to_string()))?;
    state
        .cache
        .ping()
        .await
        .map_err(|_| ApiError::DependencyUnavailable("redis not ready".to_string()))?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        database: "connected".to_string(),
        redis: "connected".to_string(),
    }))
}

/// `GET /health/ready` — Inventory service database is reachable.
///
/// # Errors
///
/// Returns 503 [`ApiError::DependencyUnavailable`] when the database is
/// down.
pub async fn inventory_readiness(
    State(state): State<InventoryState>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .inventory
        .store()
        .ping()
        .await
        .map_err(|_| ApiError::DependencyUnavailable("database not ready".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "ready",
        "database": "connected",
    })))
}

/// System routes for the booking service.
pub fn booking_routes() -> Router<BookingState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(booking_readiness))
}

/// System routes for the inventory service.
pub fn inventory_routes() -> Router<InventoryState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(inventory_readiness))
}
