//! Administrative writes: image upload and catalog append.
//!
//! Neither path is guarded against concurrent writers.

use bytes::Bytes;
use hymnal_catalog::CatalogRepository;
use hymnal_core::models::CatalogEntry;
use hymnal_core::{AppError, AppResult};
use hymnal_storage::keys::join_key;
use hymnal_storage::ObjectStorage;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedObject {
    pub success: bool,
    pub url: String,
    /// Stored object key
    pub filename: String,
}

#[derive(Clone)]
pub struct UploadService {
    storage: Option<Arc<dyn ObjectStorage>>,
    catalog: Arc<dyn CatalogRepository>,
    default_folder: String,
}

impl UploadService {
    pub fn new(
        storage: Option<Arc<dyn ObjectStorage>>,
        catalog: Arc<dyn CatalogRepository>,
        default_folder: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            catalog,
            default_folder: default_folder.into(),
        }
    }

    /// Store a file as `<dir>/<unix-millis>-<name>`.
    #[tracing::instrument(skip(self, data), fields(operation = "upload_image", size_bytes = data.len()))]
    pub async fn upload_image(
        &self,
        file_name: &str,
        data: Bytes,
        content_type: &str,
        dir: Option<&str>,
    ) -> AppResult<UploadedObject> {
        let storage = self.storage.as_ref().ok_or_else(|| {
            AppError::Config("Object storage is not configured for uploads".to_string())
        })?;

        let name = sanitize_file_name(file_name)
            .ok_or_else(|| AppError::InvalidInput("A file name is required".to_string()))?;
        if data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }

        let folder = dir
            .map(|d| d.trim_matches('/'))
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.default_folder);
        if folder.split('/').any(|part| part == "..") {
            return Err(AppError::InvalidInput(format!("Invalid directory: {}", folder)));
        }

        let key = join_key(
            folder,
            &format!("{}-{}", chrono::Utc::now().timestamp_millis(), name),
        );
        let url = storage.put(&key, data, content_type).await?;

        Ok(UploadedObject {
            success: true,
            url,
            filename: key,
        })
    }

    /// Append a hymn to the catalog, generating an id when none is given.
    #[tracing::instrument(skip(self, entry), fields(operation = "add_hymn"))]
    pub async fn add_hymn(&self, mut entry: CatalogEntry) -> AppResult<CatalogEntry> {
        if entry.filename.trim().is_empty() {
            return Err(AppError::InvalidInput("filename is required".to_string()));
        }
        if entry.file_type.trim().is_empty() {
            return Err(AppError::InvalidInput("type is required".to_string()));
        }
        if entry.id.trim().is_empty() {
            entry.id = uuid::Uuid::new_v4().to_string();
        }

        Ok(self.catalog.append(entry).await?)
    }
}

/// Last path component of a client-supplied file name.
fn sanitize_file_name(file_name: &str) -> Option<String> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
