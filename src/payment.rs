//! Mock payment gateway.
//!
//! Stands in for the real gateway integration: sleeps a configurable
//! processing delay and accepts with a configurable probability (1.0 by
//! default, so the happy path always completes).

use std::time::Duration;

use rand::Rng;

use crate::domain::reference;
use crate::error::ApiError;

/// Simulated payment gateway.
#[derive(Debug, Clone)]
pub struct MockGateway {
    success_rate: f64,
    processing_time: Duration,
}

impl MockGateway {
    /// Creates the gateway with the given simulation knobs.
    #[must_use]
    pub fn new(success_rate: f64, processing_time: Duration) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            processing_time,
        }
    }

    /// Charges the given amount against a payment token and returns the
    /// gateway transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the simulated gateway declines;
    /// the caller leaves the booking pending so the charge can be retried
    /// within the hold window.
    pub async fn charge(&self, _payment_token: &str, amount: f64) -> Result<String, ApiError> {
        if !self.processing_time.is_zero() {
            tokio::time::sleep(self.processing_time).await;
        }

        // gen_range samples [0, 1), so a rate of 1.0 always accepts.
        let accepted = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0.0..1.0) < self.success_rate
        };
        if !accepted {
            return Err(ApiError::Internal(
                "payment gateway declined the charge".to_string(),
            ));
        }

        let txn_id = reference::gateway_txn_id();
        tracing::debug!(txn_id = %txn_id, amount, "mock gateway accepted charge");
        Ok(txn_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_success_rate_always_accepts() {
        let gateway = MockGateway::new(1.0, Duration::ZERO);
        for _ in 0..20 {
            assert!(gateway.charge("tok_test", 50.0).await.is_ok());
        }
    }

    #[tokio::test]
    async fn zero_success_rate_always_declines() {
        let gateway = MockGateway::new(0.0, Duration::ZERO);
        for _ in 0..20 {
            assert!(gateway.charge("tok_test", 50.0).await.is_err());
        }
    }

    #[tokio::test]
    async fn out_of_range_rate_is_clamped() {
        let gateway = MockGateway::new(7.5, Duration::ZERO);
        assert!(gateway.charge("tok_test", 50.0).await.is_ok());
    }
}
