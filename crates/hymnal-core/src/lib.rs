//! Hymnal Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every Hymnal component: the catalog store, the object storage client, the
//! listing/search/detail services and the HTTP API.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AudioUrlMode, BaseConfig, Config, ContentConfig};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
