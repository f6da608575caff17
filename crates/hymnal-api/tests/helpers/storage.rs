//! Storage doubles for integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use hymnal_storage::{
    memory_storage, ObjectListingPage, ObjectStorage, PublicUrl, StorageBackend, StorageResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const PUBLIC_BASE: &str = "https://hymns.oss-cn-hangzhou.aliyuncs.com";

/// In-memory store holding `keys`, each with a small body.
pub async fn seeded_storage(keys: &[&str]) -> Arc<dyn ObjectStorage> {
    let storage = memory_storage(PublicUrl::new(PUBLIC_BASE));
    for key in keys {
        storage
            .put(key, Bytes::from_static(b"fixture"), "application/octet-stream")
            .await
            .expect("Failed to seed storage");
    }
    Arc::new(storage)
}

/// Wraps a store, counting calls and optionally delaying every listing.
pub struct CountingStorage {
    inner: Arc<dyn ObjectStorage>,
    list_delay: Option<Duration>,
    lists: AtomicUsize,
    probes: AtomicUsize,
}

impl CountingStorage {
    pub async fn with_keys(keys: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            inner: seeded_storage(keys).await,
            list_delay: None,
            lists: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        })
    }

    /// A store whose listings never finish within the test deadline.
    pub async fn unresponsive() -> Arc<Self> {
        Arc::new(Self {
            inner: seeded_storage(&[]).await,
            list_delay: Some(Duration::from_secs(30)),
            lists: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        })
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for CountingStorage {
    async fn list(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ObjectListingPage> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.list(prefix, marker, max_keys).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(key).await
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.inner.signed_url(key, expires_in).await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.inner.put(key, data, content_type).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    fn supports_signing(&self) -> bool {
        self.inner.supports_signing()
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
