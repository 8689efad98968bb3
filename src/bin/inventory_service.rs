//! Inventory service entry point.
//!
//! Owns the authoritative per-event seat counts and serves the three
//! internal operations the booking orchestrator consumes.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stagepass::api;
use stagepass::app_state::InventoryState;
use stagepass::config::InventoryConfig;
use stagepass::persistence::InventoryStore;
use stagepass::service::InventoryService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(InventoryConfig::from_env()?);
    tracing::info!(addr = %config.listen_addr, "starting inventory-service");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("migrations/inventory").run(&pool).await?;

    let inventory = Arc::new(InventoryService::new(InventoryStore::new(pool)));

    let state = InventoryState {
        inventory,
        config: Arc::clone(&config),
    };

    let app = api::inventory_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "inventory-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("inventory-service stopped");
    Ok(())
}
