//! Fakes shared by the service tests.

use async_trait::async_trait;
use bytes::Bytes;
use hymnal_catalog::{CatalogRepository, JsonCatalogRepository};
use hymnal_storage::{
    memory_storage, ObjectListingPage, ObjectStorage, ObjectStoreStorage, PublicUrl,
    StorageBackend, StorageError, StorageResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const PUBLIC_BASE: &str = "https://hymns.oss-cn-hangzhou.aliyuncs.com";

/// In-memory storage that counts calls and can be made slow or failing.
pub struct FakeStorage {
    inner: ObjectStoreStorage,
    pub list_calls: AtomicUsize,
    pub exists_calls: AtomicUsize,
    list_delay: Option<Duration>,
    /// Number of list calls that succeed before every later one fails
    fail_list_after: Option<usize>,
    /// Existence checks on these keys sleep first
    slow_keys: HashMap<String, Duration>,
    /// Existence checks on these keys fail
    failing_keys: HashSet<String>,
    signing: bool,
    signing_fails: bool,
}

impl FakeStorage {
    pub async fn with_keys(keys: &[&str]) -> Self {
        let inner = memory_storage(PublicUrl::new(PUBLIC_BASE));
        for key in keys {
            inner
                .put(key, Bytes::from_static(b"data"), "application/octet-stream")
                .await
                .unwrap();
        }
        FakeStorage {
            inner,
            list_calls: AtomicUsize::new(0),
            exists_calls: AtomicUsize::new(0),
            list_delay: None,
            fail_list_after: None,
            slow_keys: HashMap::new(),
            failing_keys: HashSet::new(),
            signing: false,
            signing_fails: false,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn failing_after(mut self, successful_calls: usize) -> Self {
        self.fail_list_after = Some(successful_calls);
        self
    }

    pub fn slow_key(mut self, key: &str, delay: Duration) -> Self {
        self.slow_keys.insert(key.to_string(), delay);
        self
    }

    pub fn failing_key(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn signing(mut self) -> Self {
        self.signing = true;
        self
    }

    /// Claims signing support but every signature request errors.
    pub fn failing_signatures(mut self) -> Self {
        self.signing = true;
        self.signing_fails = true;
        self
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn list(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ObjectListingPage> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(limit) = self.fail_list_after {
            if call >= limit {
                return Err(StorageError::Unavailable("connection reset".to_string()));
            }
        }
        self.inner.list(prefix, marker, max_keys).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.slow_keys.get(key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_keys.contains(key) {
            return Err(StorageError::Unavailable(format!("HEAD {} failed", key)));
        }
        self.inner.exists(key).await
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.signing_fails {
            Err(StorageError::BackendError("signature rejected".to_string()))
        } else if self.signing {
            Ok(format!(
                "{}?Expires={}&Signature=test",
                self.public_url(key),
                expires_in.as_secs()
            ))
        } else {
            Ok(self.public_url(key))
        }
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.inner.put(key, data, content_type).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    fn supports_signing(&self) -> bool {
        self.signing
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Catalog file in a temporary directory; keep the `TempDir` alive for the test.
pub fn catalog(value: serde_json::Value) -> (TempDir, Arc<dyn CatalogRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
    (dir, Arc::new(JsonCatalogRepository::new(path)))
}

/// Catalog of `count` entries named `hymn-00`, `hymn-01`, ...
pub fn numbered_catalog(count: usize) -> (TempDir, Arc<dyn CatalogRepository>) {
    let entries: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("h{}", i),
                "filename": format!("hymn-{:02}", i),
                "index": format!("{:03}", i),
                "type": "jpg"
            })
        })
        .collect();
    catalog(serde_json::Value::Array(entries))
}
