use crate::keys::{folder_prefix, PublicUrl};
use crate::traits::{ObjectEntry, ObjectListingPage, ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// [`ObjectStorage`] over any `object_store` backend
#[derive(Clone)]
pub struct ObjectStoreStorage {
    store: Arc<dyn object_store::ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    public_url: PublicUrl,
    /// Label used in logs (bucket name or root directory)
    bucket: String,
    backend: StorageBackend,
    /// Backend lists keys in lexical order (S3, in-memory); otherwise sort client-side
    ordered_listing: bool,
    /// Backend accepts a Content-Type attribute on put
    content_type_attributes: bool,
}

impl ObjectStoreStorage {
    pub fn new(
        store: Arc<dyn object_store::ObjectStore>,
        backend: StorageBackend,
        bucket: impl Into<String>,
        public_url: PublicUrl,
    ) -> Self {
        ObjectStoreStorage {
            store,
            signer: None,
            public_url,
            bucket: bucket.into(),
            backend,
            ordered_listing: true,
            content_type_attributes: true,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_unordered_listing(mut self) -> Self {
        self.ordered_listing = false;
        self
    }

    pub fn without_content_type(mut self) -> Self {
        self.content_type_attributes = false;
        self
    }

    /// Underlying store, for seeding fixtures and health probes
    pub fn inner(&self) -> Arc<dyn object_store::ObjectStore> {
        self.store.clone()
    }

    fn list_error(&self, prefix: &str, err: ObjectStoreError, start: Instant) -> StorageError {
        tracing::warn!(
            error = %err,
            bucket = %self.bucket,
            prefix = %prefix,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object listing failed"
        );
        StorageError::Unavailable(err.to_string())
    }

    /// Direct children of `prefix` strictly after `marker`, in the order the backend yields them.
    ///
    /// Stops once `limit` entries are collected when the backend is ordered.
    async fn collect_children(
        &self,
        prefix: &str,
        marker: Option<&str>,
        limit: Option<usize>,
        start: Instant,
    ) -> StorageResult<Vec<ObjectEntry>> {
        let folder = prefix.trim_matches('/');
        let prefix_path = if folder.is_empty() {
            None
        } else {
            Some(object_path(folder)?)
        };
        let child_prefix = folder_prefix(folder);

        let mut stream = match marker {
            Some(marker) if self.ordered_listing => object_store::ObjectStore::list_with_offset(
                self.store.as_ref(),
                prefix_path.as_ref(),
                &object_path(marker)?,
            ),
            _ => object_store::ObjectStore::list(self.store.as_ref(), prefix_path.as_ref()),
        };

        let mut children = Vec::new();
        while let Some(item) = stream.next().await {
            let meta: ObjectMeta = match item {
                Ok(meta) => meta,
                Err(ObjectStoreError::NotFound { .. }) => break,
                Err(e) => return Err(self.list_error(prefix, e, start)),
            };

            let name = meta.location.to_string();
            let is_direct_child = name
                .strip_prefix(&child_prefix)
                .map(|rest| !rest.is_empty() && !rest.contains('/'))
                .unwrap_or(false);
            if !is_direct_child {
                continue;
            }
            if let Some(marker) = marker {
                if name.as_str() <= marker {
                    continue;
                }
            }

            children.push(ObjectEntry {
                name,
                last_modified: meta.last_modified,
                size: meta.size,
            });

            if let Some(limit) = limit {
                if self.ordered_listing && children.len() >= limit {
                    break;
                }
            }
        }

        if !self.ordered_listing {
            children.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(children)
    }
}

/// Object path of `key`, kept verbatim: non-ASCII bytes are not percent-encoded.
fn object_path(key: &str) -> StorageResult<Path> {
    Path::parse(key).map_err(|e| StorageError::InvalidKey(format!("{}: {}", key, e)))
}

#[async_trait]
impl ObjectStorage for ObjectStoreStorage {
    async fn list(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<ObjectListingPage> {
        let start = Instant::now();
        let max_keys = max_keys.max(1);

        // One extra entry tells us whether the listing is truncated
        let mut objects = self
            .collect_children(prefix, marker, Some(max_keys + 1), start)
            .await?;

        let is_truncated = objects.len() > max_keys;
        objects.truncate(max_keys);
        let next_marker = if is_truncated {
            objects.last().map(|o| o.name.clone())
        } else {
            None
        };

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            marker = ?marker,
            count = objects.len(),
            is_truncated,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object listing successful"
        );

        Ok(ObjectListingPage {
            objects,
            is_truncated,
            next_marker,
        })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = object_path(key)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let Some(signer) = &self.signer else {
            return Ok(self.public_url(key));
        };

        let location = object_path(key)?;
        let url_result: ObjectResult<_> =
            signer.signed_url(Method::GET, &location, expires_in).await;

        let url = url_result
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .to_string();

        Ok(url)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        if key.is_empty() || key.split('/').any(|part| part == "..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let size = data.len() as u64;
        let location = object_path(key)?;
        let start = Instant::now();

        let mut attributes = Attributes::new();
        if self.content_type_attributes && !content_type.is_empty() {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = object_store::ObjectStore::put_opts(
            self.store.as_ref(),
            &location,
            PutPayload::from(data),
            opts,
        )
        .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.public_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(url)
    }

    fn public_url(&self, key: &str) -> String {
        self.public_url.url_for(key)
    }

    fn supports_signing(&self) -> bool {
        self.signer.is_some()
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    async fn seeded(keys: &[&str]) -> ObjectStoreStorage {
        let store = Arc::new(InMemory::new());
        for key in keys {
            store
                .put(&Path::parse(*key).unwrap(), PutPayload::from(Bytes::from_static(b"x")))
                .await
                .unwrap();
        }
        ObjectStoreStorage::new(
            store,
            StorageBackend::Memory,
            "memory",
            PublicUrl::new("https://cdn.test"),
        )
    }

    #[tokio::test]
    async fn list_pages_through_direct_children() {
        let storage = seeded(&[
            "hymn-image/001.a.jpg",
            "hymn-image/002.b.jpg",
            "hymn-image/003.c.jpg",
            "hymn-image/nested/004.d.jpg",
            "audio/a.mp3",
        ])
        .await;

        let first = storage.list("hymn-image/", None, 2).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert!(first.is_truncated);
        assert_eq!(first.next_marker.as_deref(), Some("hymn-image/002.b.jpg"));

        let second = storage
            .list("hymn-image/", first.next_marker.as_deref(), 2)
            .await
            .unwrap();
        let names: Vec<_> = second.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["hymn-image/003.c.jpg"]);
        assert!(!second.is_truncated);
        assert_eq!(second.next_marker, None);
    }

    #[tokio::test]
    async fn listing_a_missing_folder_is_empty() {
        let storage = seeded(&["audio/a.mp3"]).await;
        let page = storage.list("video", None, 10).await.unwrap();
        assert!(page.objects.is_empty());
        assert!(!page.is_truncated);
    }

    #[tokio::test]
    async fn exists_and_put() {
        let storage = seeded(&[]).await;
        assert!(!storage.exists("video/a.mp4").await.unwrap());

        let url = storage
            .put("video/a.mp4", Bytes::from_static(b"mp4"), "video/mp4")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/video/a.mp4");
        assert!(storage.exists("video/a.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn non_ascii_keys_round_trip_verbatim() {
        let storage = seeded(&[]).await;
        storage
            .put("hymn-image/001.恩典.jpg", Bytes::from_static(b"x"), "image/jpeg")
            .await
            .unwrap();

        let page = storage.list("hymn-image", None, 10).await.unwrap();
        assert_eq!(page.objects[0].name, "hymn-image/001.恩典.jpg");
        assert!(storage.exists("hymn-image/001.恩典.jpg").await.unwrap());

        let after = storage
            .list("hymn-image", Some("hymn-image/001.恩典.jpg"), 10)
            .await
            .unwrap();
        assert!(after.objects.is_empty());
    }

    #[tokio::test]
    async fn put_rejects_traversal() {
        let storage = seeded(&[]).await;
        let err = storage
            .put("../etc/passwd", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn signed_url_without_signer_is_public() {
        let storage = seeded(&[]).await;
        assert!(!storage.supports_signing());
        let url = storage
            .signed_url("audio/a.mp3", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/audio/a.mp3");
    }
}
