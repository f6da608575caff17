//! Hymnal Storage Library
//!
//! Object Listing Client over the media bucket. The [`ObjectStorage`] trait is
//! what the listing, search and detail services depend on; a single
//! `object_store`-backed implementation serves Aliyun OSS (through its
//! S3-compatible API), a local filesystem mirror and an in-memory store.
//!
//! # Object key format
//!
//! Media keys are `<folder>/<index>.<filename>.<extension>`, for example
//! `hymn-image/007.奇异恩典.jpg`. Key parsing and construction live in [`keys`]
//! so every caller agrees on the convention.

pub mod backend;
pub mod factory;
pub mod keys;
pub mod local;
pub mod oss;
pub mod traits;

// Re-export commonly used types
pub use backend::ObjectStoreStorage;
pub use factory::{create_storage, memory_storage};
pub use hymnal_core::StorageBackend;
pub use keys::PublicUrl;
pub use traits::{
    with_deadline, ObjectEntry, ObjectListingPage, ObjectStorage, StorageError, StorageResult,
};
