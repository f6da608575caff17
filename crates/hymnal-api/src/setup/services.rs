//! Service construction

use crate::state::AppState;
use hymnal_catalog::{CatalogRepository, DataDocumentRepository};
use hymnal_core::Config;
use hymnal_services::{
    DetailSettings, HymnDetailService, ImageListingService, ListingSettings, MediaResolver,
    MediaSettings, UploadService,
};
use hymnal_storage::ObjectStorage;
use std::sync::Arc;

/// Wire every service from configuration and the two injected dependencies.
pub fn initialize_services(
    config: &Config,
    storage: Option<Arc<dyn ObjectStorage>>,
    catalog: Arc<dyn CatalogRepository>,
) -> Arc<AppState> {
    let media = MediaResolver::new(storage.clone(), MediaSettings::from_config(config));

    let listing = ImageListingService::new(
        storage.clone(),
        catalog.clone(),
        ListingSettings::from_config(config),
    );

    let detail = HymnDetailService::new(
        catalog.clone(),
        media.clone(),
        DetailSettings::from_config(config),
    );

    let upload = UploadService::new(storage.clone(), catalog.clone(), config.image_prefix());

    Arc::new(AppState {
        config: config.clone(),
        storage,
        catalog,
        documents: DataDocumentRepository::new(config.data_dir()),
        listing,
        detail,
        media,
        upload,
    })
}
