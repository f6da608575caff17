//! Local filesystem mirror of the bucket layout.

use crate::backend::ObjectStoreStorage;
use crate::keys::PublicUrl;
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::local::LocalFileSystem;
use std::path::PathBuf;
use std::sync::Arc;

/// Build storage rooted at `base_path`; object URLs are served from `base_url`.
pub async fn local_storage(
    base_path: impl Into<PathBuf>,
    base_url: impl Into<String>,
) -> StorageResult<ObjectStoreStorage> {
    let base_path = base_path.into();
    tokio::fs::create_dir_all(&base_path).await?;

    let store = LocalFileSystem::new_with_prefix(&base_path)
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    tracing::info!(path = %base_path.display(), "Local storage initialized");

    Ok(ObjectStoreStorage::new(
        Arc::new(store),
        StorageBackend::Local,
        base_path.display().to_string(),
        PublicUrl::new(base_url),
    )
    .with_unordered_listing()
    .without_content_type())
}
