//! Hymnal Catalog Library
//!
//! The catalog is a JSON array of [`CatalogEntry`](hymnal_core::models::CatalogEntry)
//! records kept next to the service. It is re-read on every call: there is no
//! cache to invalidate, and administrative appends rewrite the whole file
//! without locking (the last writer wins).
//!
//! Auxiliary JSON documents (activity and meeting listings) live in the same
//! data directory and are served through [`DataDocumentRepository`].

pub mod documents;
pub mod error;
pub mod json;
pub mod repository;

pub use documents::DataDocumentRepository;
pub use error::{CatalogError, CatalogResult};
pub use json::JsonCatalogRepository;
pub use repository::{Catalog, CatalogRepository};
