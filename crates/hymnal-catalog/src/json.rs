use crate::error::{CatalogError, CatalogResult};
use crate::repository::{Catalog, CatalogRepository};
use async_trait::async_trait;
use hymnal_core::models::CatalogEntry;
use hymnal_core::Config;
use serde_json::Value;
use std::path::{Path, PathBuf};

const CATALOG_FILE: &str = "catalog.json";

/// Catalog stored as a JSON array on disk.
///
/// Several candidate paths are tried in order, so the same build works from
/// the repository root and from a sub-directory.
#[derive(Debug, Clone)]
pub struct JsonCatalogRepository {
    candidates: Vec<PathBuf>,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonCatalogRepository {
            candidates: vec![path.into()],
        }
    }

    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        JsonCatalogRepository { candidates }
    }

    /// `CATALOG_PATH`, then `<DATA_DIR>/catalog.json`, then `../<DATA_DIR>/catalog.json`.
    pub fn from_config(config: &Config) -> Self {
        let mut candidates = Vec::new();
        if let Some(path) = config.catalog_path() {
            candidates.push(PathBuf::from(path));
        }
        let data_dir = Path::new(config.data_dir());
        candidates.push(data_dir.join(CATALOG_FILE));
        if data_dir.is_relative() {
            candidates.push(Path::new("..").join(data_dir).join(CATALOG_FILE));
        }
        JsonCatalogRepository { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub async fn resolve_path(&self) -> Option<PathBuf> {
        for candidate in &self.candidates {
            if tokio::fs::try_exists(candidate).await.unwrap_or(false) {
                return Some(candidate.clone());
            }
        }
        None
    }

    /// The catalog file parsed as plain JSON, with the path it was read from.
    async fn read_document(&self) -> CatalogResult<(PathBuf, Value)> {
        let path = self
            .resolve_path()
            .await
            .ok_or_else(|| CatalogError::NotFound {
                tried: self.candidates.clone(),
            })?;

        let raw = tokio::fs::read(&path).await?;
        let document: Value =
            serde_json::from_slice(&raw).map_err(|source| CatalogError::Parse {
                path: path.clone(),
                source,
            })?;

        if !document.is_array() {
            return Err(CatalogError::NotAnArray { path });
        }
        Ok((path, document))
    }

    async fn read(&self) -> CatalogResult<(PathBuf, Catalog)> {
        let (path, document) = self.read_document().await?;
        let entries = parse_entries(&path, document);
        Ok((path, Catalog::new(entries)))
    }
}

/// Typed entries of a catalog array. Elements that do not describe an entry
/// are skipped; they stay in the file and in the raw document.
fn parse_entries(path: &Path, document: Value) -> Vec<CatalogEntry> {
    let Value::Array(items) = document else {
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value::<CatalogEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    position,
                    error = %e,
                    "Skipping malformed catalog entry"
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl CatalogRepository for JsonCatalogRepository {
    #[tracing::instrument(skip(self), fields(catalog.operation = "load"))]
    async fn load(&self) -> CatalogResult<Catalog> {
        let (path, catalog) = self.read().await?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    async fn load_raw(&self) -> CatalogResult<Value> {
        let (_, document) = self.read_document().await?;
        Ok(document)
    }

    /// Unguarded read-modify-write: concurrent appends can lose updates.
    #[tracing::instrument(skip(self, entry), fields(catalog.operation = "append", entry.id = %entry.id))]
    async fn append(&self, entry: CatalogEntry) -> CatalogResult<CatalogEntry> {
        let (path, mut document) = match self.read_document().await {
            Ok(found) => found,
            Err(CatalogError::NotFound { .. }) => {
                let path = self
                    .candidates
                    .first()
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(CATALOG_FILE));
                (path, Value::Array(Vec::new()))
            }
            Err(e) => return Err(e),
        };

        let item = serde_json::to_value(&entry).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;
        let Some(entries) = document.as_array_mut() else {
            return Err(CatalogError::NotAnArray { path });
        };
        entries.push(item);
        let count = entries.len();

        let body = serde_json::to_vec_pretty(&document).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;

        tracing::info!(path = %path.display(), entries = count, "Catalog entry appended");
        Ok(entry)
    }

    async fn is_available(&self) -> bool {
        self.resolve_path().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hymnal_core::ContentConfig;
    use serde_json::json;

    fn write_catalog(dir: &Path, value: serde_json::Value) -> PathBuf {
        let path = dir.join(CATALOG_FILE);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([{ "id": "1", "filename": "恩典", "index": "001", "type": "jpg", "tag": "感恩" }]),
        );

        let repo = JsonCatalogRepository::with_candidates(vec![dir.path().join("missing.json"), path]);
        let catalog = repo.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            repo.find_by_filename("恩典").await.unwrap().unwrap().tag.as_deref(),
            Some("感恩")
        );
    }

    #[tokio::test]
    async fn missing_catalog_lists_every_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonCatalogRepository::with_candidates(vec![
            dir.path().join("a.json"),
            dir.path().join("b.json"),
        ]);

        match repo.load().await {
            Err(err @ CatalogError::NotFound { .. }) => {
                let message = err.to_string();
                assert!(message.contains("a.json"));
                assert!(message.contains("b.json"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(!repo.is_available().await);
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE);
        std::fs::write(&path, b"[{ not json").unwrap();

        let repo = JsonCatalogRepository::new(path);
        assert!(matches!(repo.load().await, Err(CatalogError::Parse { .. })));
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([
                { "id": "1", "filename": "恩典", "index": null, "type": "jpg" },
                { "id": "2", "filename": 42, "index": "002", "type": "png" },
                "stray",
                { "id": "3", "filename": "慈爱", "index": 3, "type": "png" }
            ]),
        );
        let repo = JsonCatalogRepository::new(path);

        let catalog = repo.load().await.unwrap();
        let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let raw = repo.load_raw().await.unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 4);
        assert_eq!(raw[1]["filename"], 42);
        assert_eq!(raw[2], "stray");
    }

    #[tokio::test]
    async fn non_array_catalog_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(dir.path(), json!({ "entries": [] }));
        let repo = JsonCatalogRepository::new(path);

        assert!(matches!(repo.load().await, Err(CatalogError::NotAnArray { .. })));
        assert!(matches!(repo.load_raw().await, Err(CatalogError::NotAnArray { .. })));
    }

    #[tokio::test]
    async fn append_keeps_entries_it_cannot_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([{ "id": "1", "filename": 42, "index": "001", "type": "jpg" }]),
        );
        let repo = JsonCatalogRepository::new(path.clone());

        let entry: CatalogEntry = serde_json::from_value(
            json!({ "id": "2", "filename": "慈爱", "index": "002", "type": "png" }),
        )
        .unwrap();
        repo.append(entry).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 2);
        assert_eq!(raw[0]["filename"], 42);
        assert_eq!(repo.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reads_fresh_on_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(dir.path(), json!([]));
        let repo = JsonCatalogRepository::new(path.clone());
        assert!(repo.load().await.unwrap().is_empty());

        write_catalog(
            dir.path(),
            json!([{ "id": "2", "filename": "慈爱", "index": "002", "type": "png" }]),
        );
        assert_eq!(repo.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn append_rewrites_file_preserving_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([{ "id": "1", "filename": "恩典", "index": "001", "type": "jpg", "composer": "x" }]),
        );
        let repo = JsonCatalogRepository::new(path.clone());

        let entry: CatalogEntry = serde_json::from_value(
            json!({ "id": "2", "filename": "慈爱", "index": "002", "type": "png" }),
        )
        .unwrap();
        repo.append(entry).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 2);
        assert_eq!(raw[0]["composer"], "x");
        assert_eq!(raw[1]["filename"], "慈爱");
    }

    #[tokio::test]
    async fn append_creates_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api").join(CATALOG_FILE);
        let repo = JsonCatalogRepository::new(path.clone());

        let entry: CatalogEntry = serde_json::from_value(
            json!({ "id": "1", "filename": "恩典", "index": 1, "type": "jpg" }),
        )
        .unwrap();
        repo.append(entry).await.unwrap();
        assert_eq!(repo.load().await.unwrap().len(), 1);
    }

    #[test]
    fn config_candidates_follow_data_dir() {
        let config = Config::from(ContentConfig {
            catalog_path: Some("/srv/catalog.json".to_string()),
            ..ContentConfig::default()
        });
        let repo = JsonCatalogRepository::from_config(&config);
        assert_eq!(
            repo.candidates(),
            &[
                PathBuf::from("/srv/catalog.json"),
                PathBuf::from("api/catalog.json"),
                PathBuf::from("../api/catalog.json"),
            ]
        );
    }
}
