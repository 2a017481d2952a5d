//! TravelSmart Server - keeps itinerary routes and visited countries up to date

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travelsmart_core::demo_itinerary;
use travelsmart_server::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("travelsmart_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting TravelSmart server...");

    let config = Config::from_env();
    let port = config.server_port;
    let seed_demo = config.seed_demo;
    let state = Arc::new(AppState::new(config)?);

    if seed_demo {
        let snapshot = state.replace(demo_itinerary());
        tracing::info!(destinations = snapshot.len(), "Seeded demo itinerary");
    }

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
