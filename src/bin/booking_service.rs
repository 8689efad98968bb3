//! Booking orchestrator entry point.
//!
//! Wires the stores, the Redis handle, the inventory client, and the
//! services together, spawns the supervised expiry worker, and serves the
//! Axum router until a termination signal drains everything.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stagepass::api;
use stagepass::app_state::BookingState;
use stagepass::cache::RedisStore;
use stagepass::clients::InventoryClient;
use stagepass::config::BookingConfig;
use stagepass::payment::MockGateway;
use stagepass::persistence::{BookingStore, WaitlistStore};
use stagepass::service::{BookingService, ExpiryWorker, WaitlistService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(BookingConfig::from_env()?);
    tracing::info!(addr = %config.listen_addr, "starting booking-service");

    // Durable store
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("migrations/booking").run(&pool).await?;

    // Ephemeral store and sibling service
    let cache = RedisStore::connect(&config.redis_url).await?;
    let inventory = InventoryClient::new(&config.inventory_service_url, &config.internal_api_key)?;

    // Service layer
    let waitlist = Arc::new(WaitlistService::new(
        WaitlistStore::new(pool.clone()),
        inventory.clone(),
        config.waitlist_offer_duration,
    ));
    let gateway = MockGateway::new(
        config.mock_payment_success_rate,
        config.mock_payment_processing_time,
    );
    let bookings = Arc::new(BookingService::new(
        BookingStore::new(pool.clone()),
        cache.clone(),
        inventory,
        Arc::clone(&waitlist),
        gateway,
        Arc::clone(&config),
    ));

    // Background expiry worker, stopped through the watch channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = ExpiryWorker::spawn(
        Arc::clone(&bookings),
        config.cleanup_interval,
        shutdown_rx,
    );

    let state = BookingState {
        bookings,
        waitlist,
        cache,
        config: Arc::clone(&config),
    };

    let app = api::booking_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "booking-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop accepting ticks, then let the in-flight sweep finish.
    let _ = shutdown_tx.send(true);
    worker.join().await;
    tracing::info!("booking-service stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
