//! Service error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for both services. Each variant
//! maps to a specific HTTP status code; responses are rendered as
//! `{"error": "<message>"}` and never leak stack traces.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {"error": "Not enough seats available"}
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant | HTTP Status |
/// |---|---|
/// | `InvalidInput`, `HoldExpired` | 400 Bad Request |
/// | `Unauthenticated` | 401 Unauthorized |
/// | `Forbidden` | 403 Forbidden |
/// | `NotFound` | 404 Not Found |
/// | `InvalidState`, `VersionConflict`, `SoldOut` | 409 Conflict |
/// | `RateLimited` | 429 Too Many Requests |
/// | `Database`, `Internal` | 500 Internal Server Error |
/// | `Redis`, `Upstream`, `DependencyUnavailable` | 503 Service Unavailable |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request: bad JSON, missing field, invalid id format.
    #[error("{0}")]
    InvalidInput(String),

    /// Bearer token missing, invalid, or expired.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Resource absent (or not in a bookable state).
    #[error("{0}")]
    NotFound(String),

    /// Operation illegal in the current booking/event state.
    #[error("{0}")]
    InvalidState(String),

    /// Inventory CAS lost; the caller should refetch and retry.
    #[error("event was updated by another process, please retry")]
    VersionConflict,

    /// Not enough seats at attempt time.
    #[error("not enough seats available")]
    SoldOut,

    /// Per-user reserve budget exhausted for this minute.
    #[error("too many booking attempts, please try again later")]
    RateLimited,

    /// The ephemeral reservation hold is gone.
    #[error("reservation not found or expired")]
    HoldExpired,

    /// Durable store failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Ephemeral store failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Inter-service HTTP failure.
    #[error("upstream service error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// A dependency reported itself not ready.
    #[error("{0}")]
    DependencyUnavailable(String),

    /// Internal failure; any partial work has been compensated.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::HoldExpired => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidState(_) | Self::VersionConflict | Self::SoldOut => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Redis(_) | Self::Upstream(_) | Self::DependencyUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_family_maps_to_409() {
        assert_eq!(ApiError::VersionConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::SoldOut.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InvalidState("already cancelled".to_string()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn hold_expired_is_a_client_error() {
        assert_eq!(ApiError::HoldExpired.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limited_maps_to_429() {
        assert_eq!(
            ApiError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn auth_errors_distinguish_401_from_403() {
        assert_eq!(
            ApiError::Unauthenticated("missing token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("wrong key".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
