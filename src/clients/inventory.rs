//! Typed client for the inventory service's internal API.
//!
//! Stateless: every call carries the shared API key and a 10 s timeout.
//! Conflict responses are mapped back into the typed errors the booking
//! flow branches on ([`ApiError::VersionConflict`] / [`ApiError::SoldOut`]).

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{EventForBooking, InventorySnapshot};
use crate::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
}

/// Client for `GET /internal/events/{id}` and the two delta endpoints.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl InventoryClient {
    /// Builds the client with the default per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    /// Fetches the booking-relevant slice of an event.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the event is absent or not bookable.
    /// - [`ApiError::Upstream`] / [`ApiError::DependencyUnavailable`] on
    ///   transport or unexpected upstream failures.
    pub async fn get_event_for_booking(
        &self,
        event_id: Uuid,
    ) -> Result<EventForBooking, ApiError> {
        let response = self
            .http
            .get(format!("{}/internal/events/{event_id}", self.base_url))
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(
                "event not found or not available for booking".to_string(),
            )),
            status => Err(ApiError::DependencyUnavailable(format!(
                "inventory service returned status {status}"
            ))),
        }
    }

    /// Applies a seat delta: negative reserves, positive returns.
    ///
    /// # Errors
    ///
    /// - [`ApiError::VersionConflict`] when the CAS lost.
    /// - [`ApiError::SoldOut`] when the seats are gone.
    /// - [`ApiError::NotFound`] for an absent event.
    /// - [`ApiError::Upstream`] / [`ApiError::DependencyUnavailable`]
    ///   otherwise.
    pub async fn update_availability(
        &self,
        event_id: Uuid,
        quantity: i32,
        version: i32,
    ) -> Result<InventorySnapshot, ApiError> {
        self.post_delta("update-availability", event_id, quantity, version)
            .await
    }

    /// Returns seats on the cancel/expire paths.
    ///
    /// # Errors
    ///
    /// Same surface as [`Self::update_availability`].
    pub async fn return_seats(
        &self,
        event_id: Uuid,
        quantity: i32,
        version: i32,
    ) -> Result<InventorySnapshot, ApiError> {
        self.post_delta("return-seats", event_id, quantity, version)
            .await
    }

    async fn post_delta(
        &self,
        endpoint: &str,
        event_id: Uuid,
        quantity: i32,
        version: i32,
    ) -> Result<InventorySnapshot, ApiError> {
        let response = self
            .http
            .post(format!(
                "{}/internal/events/{event_id}/{endpoint}",
                self.base_url
            ))
            .header("X-API-Key", &self.api_key)
            .json(&serde_json::json!({ "quantity": quantity, "version": version }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::CONFLICT => {
                let message = response
                    .json::<WireError>()
                    .await
                    .map(|body| body.error)
                    .unwrap_or_default();
                // The inventory service distinguishes its 409s only in the
                // message; the CAS loss always mentions the racing writer.
                if message.contains("version") || message.contains("another process") {
                    Err(ApiError::VersionConflict)
                } else if message.contains("capacity") {
                    Err(ApiError::InvalidState(message))
                } else {
                    Err(ApiError::SoldOut)
                }
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound("event not found".to_string())),
            status => Err(ApiError::DependencyUnavailable(format!(
                "inventory service returned status {status}"
            ))),
        }
    }
}
