//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hymnal_core::AppError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Network or service trouble; callers degrade, the client never retries.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage operation timed out: {0}")]
    Timeout(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether the failure is worth degrading around rather than surfacing.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::Timeout(msg) => AppError::UpstreamTimeout(msg),
            StorageError::Unavailable(msg) => AppError::UpstreamUnavailable(msg),
            StorageError::UploadFailed(msg) | StorageError::BackendError(msg) => {
                AppError::Storage(msg)
            }
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Config(msg),
        }
    }
}

/// One object of a listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// Full object key, folder included
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// Result of one listing call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectListingPage {
    pub objects: Vec<ObjectEntry>,
    /// More keys exist after the last returned one
    pub is_truncated: bool,
    /// Marker to pass to the next call, set when truncated
    pub next_marker: Option<String>,
}

/// Object storage abstraction
///
/// Listing is delimiter-style: only direct children of `prefix` are returned,
/// in lexical key order, starting strictly after `marker`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List at most `max_keys` objects under `prefix`.
    async fn list(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ObjectListingPage>;

    /// Check whether an object exists without fetching its body.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Time-limited GET URL; the public URL when the backend cannot sign.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Write an object and return its public URL.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String>;

    /// Non-expiring public URL of a key.
    fn public_url(&self, key: &str) -> String;

    /// Whether `signed_url` produces real signatures.
    fn supports_signing(&self) -> bool;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Bound a storage call by `deadline`, mapping expiry to [`StorageError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, operation: &str, fut: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(format!(
            "{} exceeded {}ms",
            operation,
            deadline.as_millis()
        ))),
    }
}
