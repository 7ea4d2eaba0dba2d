// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Vingo Auth API Server
//!
//! Account, session and password-reset backend for the Vingo web client.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vingo_auth::{
    config::{Config, StoreBackend},
    db::FirestoreDb,
    services::MailService,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Vingo Auth API");

    let db = match config.store_backend {
        StoreBackend::Firestore => FirestoreDb::new(&config.gcp_project_id).await?,
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory identity store; accounts are lost on restart");
            FirestoreDb::new_in_memory()
        }
    };

    let mail = MailService::new(&config.smtp)?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, mail));

    // Build router
    let app = vingo_auth::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vingo_auth=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
