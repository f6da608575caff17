use crate::error::CatalogResult;
use async_trait::async_trait;
use hymnal_core::models::CatalogEntry;
use serde_json::Value;

/// A loaded catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Catalog { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// First entry whose `filename` matches exactly.
    ///
    /// Filenames are not unique across types and folders; later entries sharing
    /// a filename are never returned.
    pub fn find_by_filename(&self, filename: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.filename == filename)
    }
}

/// Catalog Store
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Read and parse the catalog.
    async fn load(&self) -> CatalogResult<Catalog>;

    /// The catalog document exactly as stored, malformed entries included.
    async fn load_raw(&self) -> CatalogResult<Value>;

    /// Append one entry and rewrite the catalog.
    async fn append(&self, entry: CatalogEntry) -> CatalogResult<CatalogEntry>;

    /// Whether a catalog file can currently be found.
    async fn is_available(&self) -> bool;

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<CatalogEntry>> {
        Ok(self.load().await?.find_by_id(id).cloned())
    }

    async fn find_by_filename(&self, filename: &str) -> CatalogResult<Option<CatalogEntry>> {
        Ok(self.load().await?.find_by_filename(filename).cloned())
    }
}
