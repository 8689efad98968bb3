//! Background expiry worker.
//!
//! One cooperative loop per orchestrator instance. Each tick runs the
//! expired-booking sweep followed by the expired-offer sweep. Replicas may
//! run concurrently: the booking transition is conditional on
//! `status = 'pending' AND expires_at < now()`, so a booking is processed
//! by at most one of them.
//!
//! The worker is supervised: it listens on a `watch` channel and drains the
//! in-flight sweep before exiting when the process receives a termination
//! signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::service::BookingService;

/// Handle to the spawned expiry loop.
#[derive(Debug)]
pub struct ExpiryWorker {
    handle: JoinHandle<()>,
}

impl ExpiryWorker {
    /// Spawns the worker with the given tick interval. Flip the watch
    /// channel to `true` to stop it; the current sweep finishes first.
    #[must_use]
    pub fn spawn(
        booking: Arc<BookingService>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of `interval` fires immediately; skip it so a
            // freshly started instance does not race its own warm-up.
            ticker.tick().await;

            tracing::info!(
                interval_secs = interval.as_secs(),
                "reservation expiry worker started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = booking.run_sweep().await {
                            tracing::error!(error = %e, "expiry sweep failed");
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            tracing::info!("expiry worker shutting down");
                            break;
                        }
                    }
                }
            }
        });
        Self { handle }
    }

    /// Waits for the worker to finish its current sweep and exit.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "expiry worker task panicked");
        }
    }
}
