//! Paginated listing and search over the image folder.
//!
//! Both operations read the object store when it is configured and reachable,
//! enrich keys from the catalog, sort by filename and page the result. When the
//! store is absent or slow, listing is served from the catalog instead.

use hymnal_catalog::{Catalog, CatalogRepository};
use hymnal_core::models::{CatalogEntry, ImageItem, ImagePage, PaginationDescriptor, UNKNOWN_TOTAL};
use hymnal_core::{AppError, AppResult, Config};
use hymnal_storage::keys::{folder_prefix, has_image_extension, parse_object_name, strip_folder};
use hymnal_storage::{with_deadline, ObjectEntry, ObjectStorage, PublicUrl};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub image_prefix: String,
    pub listing_timeout: Duration,
    pub search_batch_size: usize,
    pub search_max_batches: usize,
    /// URL base for catalog-derived items (the store's own base otherwise)
    pub public_url: PublicUrl,
}

impl ListingSettings {
    pub fn from_config(config: &Config) -> Self {
        ListingSettings {
            image_prefix: config.image_prefix().to_string(),
            listing_timeout: config.listing_timeout(),
            search_batch_size: config.search_batch_size(),
            search_max_batches: config.search_max_batches(),
            public_url: PublicUrl::new(config.public_base_url()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub page: u32,
    pub page_size: u32,
    pub marker: Option<String>,
    /// Logical folder, defaults to the image folder
    pub dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// Pagination/Search Engine
#[derive(Clone)]
pub struct ImageListingService {
    storage: Option<Arc<dyn ObjectStorage>>,
    catalog: Arc<dyn CatalogRepository>,
    settings: ListingSettings,
}

impl ImageListingService {
    pub fn new(
        storage: Option<Arc<dyn ObjectStorage>>,
        catalog: Arc<dyn CatalogRepository>,
        settings: ListingSettings,
    ) -> Self {
        Self {
            storage,
            catalog,
            settings,
        }
    }

    /// One page of images under a folder.
    #[tracing::instrument(skip(self), fields(operation = "list_images"))]
    pub async fn list_images(&self, request: ListRequest) -> AppResult<ImagePage> {
        let page = request.page.max(1);
        let page_size = request.page_size.max(1);
        let folder = request
            .dir
            .as_deref()
            .map(|d| d.trim_matches('/'))
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.settings.image_prefix)
            .to_string();

        let Some(storage) = &self.storage else {
            tracing::warn!(folder = %folder, "Object storage not configured, listing from catalog");
            return self.catalog_listing(&folder, page, page_size).await;
        };

        let listing = with_deadline(
            self.settings.listing_timeout,
            "image listing",
            storage.list(
                &folder_prefix(&folder),
                request.marker.as_deref(),
                page_size as usize,
            ),
        )
        .await;

        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(error = %e, folder = %folder, "Object listing failed, listing from catalog");
                return self.catalog_listing(&folder, page, page_size).await;
            }
        };

        let catalog = self.enrichment_catalog().await;
        let mut images: Vec<ImageItem> = listing
            .objects
            .iter()
            .filter_map(|object| image_item(object, &folder, &catalog, storage.as_ref()))
            .collect();
        sort_by_filename(&mut images);

        let total = if listing.is_truncated {
            UNKNOWN_TOTAL
        } else if listing.objects.is_empty() {
            0
        } else {
            ((page - 1) as i64) * (page_size as i64) + images.len() as i64
        };

        Ok(ImagePage {
            images,
            pagination: PaginationDescriptor {
                current: page,
                page_size,
                total,
                has_more: listing.is_truncated,
                next_marker: listing.next_marker,
            },
        })
    }

    /// Case-insensitive substring search over image names.
    ///
    /// Scans the image folder in batches, stopping once enough matches exist
    /// for the requested page or the batch cap is reached.
    #[tracing::instrument(skip(self), fields(operation = "search_images"))]
    pub async fn search_images(&self, request: SearchRequest) -> AppResult<ImagePage> {
        if request.query.trim().is_empty() {
            return Err(AppError::InvalidInput("Search query is required".to_string()));
        }

        let page = request.page.max(1);
        let page_size = request.page_size.max(1);
        let needle = request.query.to_lowercase();
        let folder = self.settings.image_prefix.clone();

        let Some(storage) = &self.storage else {
            tracing::warn!("Object storage not configured, searching catalog");
            return self.catalog_search(&needle, page, page_size).await;
        };

        let wanted = (page as usize) * (page_size as usize);
        let prefix = folder_prefix(&folder);
        let mut matched: Vec<ObjectEntry> = Vec::new();
        let mut marker: Option<String> = None;
        let mut may_have_more = false;
        let mut batches = 0;

        while batches < self.settings.search_max_batches {
            let result = with_deadline(
                self.settings.listing_timeout,
                "search batch",
                storage.list(&prefix, marker.as_deref(), self.settings.search_batch_size),
            )
            .await;

            let listing = match result {
                Ok(listing) => listing,
                Err(e) if batches == 0 => {
                    tracing::warn!(error = %e, "Search listing failed, searching catalog");
                    return self.catalog_search(&needle, page, page_size).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, batches, "Search listing failed, returning partial results");
                    may_have_more = true;
                    break;
                }
            };
            batches += 1;

            matched.extend(listing.objects.into_iter().filter(|object| {
                strip_folder(&object.name, &folder)
                    .map(|name| has_image_extension(name) && name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            }));

            may_have_more = listing.is_truncated;
            marker = listing.next_marker;
            if !may_have_more || matched.len() >= wanted {
                break;
            }
        }

        tracing::debug!(
            batches,
            matches = matched.len(),
            may_have_more,
            "Search scan finished"
        );

        let catalog = self.enrichment_catalog().await;
        let mut images: Vec<ImageItem> = matched
            .iter()
            .filter_map(|object| image_item(object, &folder, &catalog, storage.as_ref()))
            .collect();
        sort_by_filename(&mut images);

        Ok(slice_page(images, page, page_size, may_have_more))
    }

    async fn catalog_listing(&self, folder: &str, page: u32, page_size: u32) -> AppResult<ImagePage> {
        let catalog = self.catalog.load().await?;
        let mut images: Vec<ImageItem> = catalog
            .entries()
            .iter()
            .map(|entry| self.catalog_item(entry, folder))
            .collect();
        sort_by_filename(&mut images);
        Ok(slice_page(images, page, page_size, false))
    }

    async fn catalog_search(&self, needle: &str, page: u32, page_size: u32) -> AppResult<ImagePage> {
        let folder = self.settings.image_prefix.clone();
        let catalog = self.catalog.load().await?;
        let mut images: Vec<ImageItem> = catalog
            .entries()
            .iter()
            .filter(|entry| entry.object_name().to_lowercase().contains(needle))
            .map(|entry| self.catalog_item(entry, &folder))
            .collect();
        sort_by_filename(&mut images);
        Ok(slice_page(images, page, page_size, false))
    }

    fn catalog_item(&self, entry: &CatalogEntry, folder: &str) -> ImageItem {
        ImageItem {
            id: Some(entry.id.clone()).filter(|id| !id.is_empty()),
            index: entry.index.to_string(),
            filename: entry.filename.clone(),
            url: self.settings.public_url.url_for(&entry.object_key(folder)),
            last_modified: None,
            size: None,
            tag: entry.tag.clone().filter(|t| !t.is_empty()),
        }
    }

    /// Catalog used only to attach ids and tags; listing still succeeds without it.
    async fn enrichment_catalog(&self) -> Catalog {
        match self.catalog.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog unavailable, images returned without ids");
                Catalog::default()
            }
        }
    }
}

fn image_item(
    object: &ObjectEntry,
    folder: &str,
    catalog: &Catalog,
    storage: &dyn ObjectStorage,
) -> Option<ImageItem> {
    let name = strip_folder(&object.name, folder)?;
    if !has_image_extension(name) {
        return None;
    }

    let parsed = parse_object_name(name);
    let entry = catalog.find_by_filename(&parsed.filename);

    Some(ImageItem {
        id: entry.map(|e| e.id.clone()).filter(|id| !id.is_empty()),
        index: parsed.index,
        url: storage.public_url(&object.name),
        last_modified: Some(object.last_modified),
        size: Some(object.size),
        tag: entry.and_then(|e| e.tag.clone()).filter(|t| !t.is_empty()),
        filename: parsed.filename,
    })
}

/// Stable, case-insensitive ascending order by filename.
fn sort_by_filename(images: &mut [ImageItem]) {
    images.sort_by_cached_key(|image| image.filename.to_lowercase());
}

/// Page `[(page-1)*size, page*size)` of a fully materialized result.
///
/// `may_have_more` marks results cut short by the scan, which makes the total unknown.
fn slice_page(images: Vec<ImageItem>, page: u32, page_size: u32, may_have_more: bool) -> ImagePage {
    let total = images.len();
    let start = ((page - 1) as usize).saturating_mul(page_size as usize).min(total);
    let end = start.saturating_add(page_size as usize).min(total);

    let has_more = end < total || may_have_more;
    let images: Vec<ImageItem> = images.into_iter().skip(start).take(end - start).collect();

    ImagePage {
        images,
        pagination: PaginationDescriptor {
            current: page,
            page_size,
            total: if may_have_more {
                UNKNOWN_TOTAL
            } else {
                total as i64
            },
            has_more,
            next_marker: None,
        },
    }
}
