//! Waitlist DTOs: join, position, leave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Request body for `POST /waitlist/join`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinWaitlistRequest {
    /// Event to queue for.
    pub event_id: Uuid,
    /// Seats the user wants.
    pub quantity: i32,
}

/// Response body for `POST /waitlist/join`.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinWaitlistResponse {
    /// Entry id.
    pub waitlist_id: Uuid,
    /// 1-based queue position.
    pub position: i32,
    /// Coarse human wait estimate.
    pub estimated_wait: String,
    /// Entry status string.
    pub status: String,
}

/// Query parameters for `GET /waitlist/position`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WaitlistPositionParams {
    /// Event to look up.
    pub event_id: Uuid,
}

/// Response body for `GET /waitlist/position`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistPositionResponse {
    /// 1-based queue position.
    pub position: i32,
    /// How many entries are waiting on this event.
    pub total_waiting: i64,
    /// Entry status string.
    pub status: String,
    /// Coarse human wait estimate.
    pub estimated_wait: String,
    /// Seats the user asked for.
    pub quantity_requested: i32,
    /// When the offer was made, while offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offered_at: Option<DateTime<Utc>>,
    /// Offer claim deadline, while offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `DELETE /waitlist/leave`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveWaitlistRequest {
    /// Event to leave the queue of.
    pub event_id: Uuid,
}
