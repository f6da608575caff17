//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p hymnal-api`.
//! Each app gets its own temporary data directory; object storage is either
//! absent (catalog-only mode) or an in-memory store seeded per test.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use hymnal_api::constants;
use hymnal_api::setup::{routes, services};
use hymnal_catalog::JsonCatalogRepository;
use hymnal_core::{Config, ContentConfig, StorageBackend};
use hymnal_storage::ObjectStorage;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub use storage::PUBLIC_BASE;

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn catalog_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("catalog.json")
    }
}

pub fn create_test_config(data_dir: &Path) -> Config {
    let mut content = ContentConfig::default();
    content.storage_backend = StorageBackend::Memory;
    content.local_storage_base_url = Some(PUBLIC_BASE.to_string());
    content.data_dir = data_dir.to_string_lossy().to_string();
    content.catalog_path = Some(data_dir.join("catalog.json").to_string_lossy().to_string());
    content.listing_timeout_ms = 500;
    content.probe_timeout_ms = 200;
    Config::from(content)
}

/// App over `catalog`, optionally backed by `storage`.
pub async fn setup_test_app(
    catalog: serde_json::Value,
    storage: Option<Arc<dyn ObjectStorage>>,
) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fixtures::write_json(data_dir.path(), "catalog.json", &catalog);
    build_app(data_dir, storage)
}

/// App whose data directory has no catalog file at all.
pub async fn setup_app_without_catalog(storage: Option<Arc<dyn ObjectStorage>>) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp directory");
    build_app(data_dir, storage)
}

fn build_app(data_dir: TempDir, storage: Option<Arc<dyn ObjectStorage>>) -> TestApp {
    let config = create_test_config(data_dir.path());
    let catalog = Arc::new(JsonCatalogRepository::from_config(&config));
    let state = services::initialize_services(&config, storage, catalog);
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, data_dir }
}
