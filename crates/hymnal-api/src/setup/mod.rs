//! Application setup and initialization
//!
//! Everything `main` needs to go from a [`Config`] to a running router lives here,
//! split so tests can build the same state and routes without a listener.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use hymnal_catalog::JsonCatalogRepository;
use hymnal_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;

    let catalog = JsonCatalogRepository::from_config(&config);
    tracing::info!(candidates = ?catalog.candidates(), "Catalog repository configured");

    let state = services::initialize_services(&config, storage, Arc::new(catalog));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
