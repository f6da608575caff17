//! Application state shared by every handler.
//!
//! Services are constructed once at startup and injected here; nothing in the
//! state is mutated after construction.

use hymnal_catalog::{CatalogRepository, DataDocumentRepository};
use hymnal_core::Config;
use hymnal_services::{HymnDetailService, ImageListingService, MediaResolver, UploadService};
use hymnal_storage::ObjectStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when object storage is not configured; listing then serves the catalog.
    pub storage: Option<Arc<dyn ObjectStorage>>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub documents: DataDocumentRepository,
    pub listing: ImageListingService,
    pub detail: HymnDetailService,
    pub media: MediaResolver,
    pub upload: UploadService,
}
