//! Inventory internal-API DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the two delta endpoints.
///
/// On `update-availability` a negative quantity reserves and a positive one
/// returns; `return-seats` accepts only positive quantities.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAvailabilityRequest {
    /// Seat delta to apply.
    pub quantity: i32,
    /// Expected inventory version (optimistic concurrency).
    pub version: i32,
}
