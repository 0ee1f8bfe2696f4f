//! # Scout Search API
//!
//! HTTP server exposing the product lookup surface.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Search API Server                                │
//! │                                                                         │
//! │  Client ───► HTTP (8080) ───► Handlers ───► scout-core ───► SQLite     │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                             Token gate                                  │
//! │                          (per-request 403)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod gate;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use scout_db::{Database, DbConfig};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "info,scout_core=debug,scout_db=debug,scout_search_api=debug".into()
        }))
        .with_target(true)
        .init();

    info!("Starting Scout search API server...");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        port = config.port,
        db_path = %config.database_path,
        base_url = %config.base_url,
        token_guard = config.api_token.is_some(),
        "Configuration loaded"
    );

    // Connect to database (runs migrations on connect)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite, migrations complete");

    // Create shared state
    let state = Arc::new(AppState::new(db, config.clone()));

    // Build server address
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(%addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
