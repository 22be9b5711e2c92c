//! Application setup and initialization
//!
//! Startup wiring lives here rather than in main.rs so integration tests can
//! build the same router over an in-memory store.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::constants::SERVICE_NAME;
use crate::state::AppState;
use anyhow::{Context, Result};
use filestash_core::Config;
use filestash_services::RetentionService;
use std::sync::Arc;

/// Everything `main` needs to serve requests and run the retention sweep.
pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    pub retention: Arc<RetentionService>,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    filestash_infra::init_telemetry(SERVICE_NAME, config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = storage::setup_storage(&config).await?;
    let (state, retention) = services::initialize_services(&config, store);
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok(App {
        state,
        router,
        retention,
    })
}
