//! Storage setup and initialization

use anyhow::Result;
use hymnal_core::Config;
use hymnal_storage::{create_storage, ObjectStorage, StorageError};
use std::sync::Arc;

/// Build the object store client.
///
/// Missing credentials are not fatal: the service then runs in catalog-only
/// mode and `None` is returned. Any other failure aborts startup.
pub async fn setup_storage(config: &Config) -> Result<Option<Arc<dyn ObjectStorage>>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing storage...");

    match create_storage(config).await {
        Ok(storage) => {
            tracing::info!(
                backend = ?storage.backend_type(),
                signing = storage.supports_signing(),
                "Storage initialized successfully"
            );
            Ok(Some(storage))
        }
        Err(StorageError::ConfigError(reason)) => {
            tracing::warn!(
                reason = %reason,
                "Object storage not configured, serving listings from the catalog"
            );
            Ok(None)
        }
        Err(e) => Err(anyhow::anyhow!("Failed to initialize storage: {}", e)),
    }
}
