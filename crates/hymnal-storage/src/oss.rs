//! Aliyun OSS through its S3-compatible API.

use crate::backend::ObjectStoreStorage;
use crate::keys::PublicUrl;
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::aws::AmazonS3Builder;
use object_store::signer::Signer;
use object_store::RetryConfig;
use std::sync::Arc;

/// Connection settings for one OSS bucket
#[derive(Debug, Clone)]
pub struct OssSettings {
    pub bucket: String,
    /// Region as OSS names it, e.g. `oss-cn-hangzhou`
    pub region: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Overrides the bucket endpoint (MinIO or other S3-compatible stores in development)
    pub endpoint: Option<String>,
}

impl OssSettings {
    /// Virtual-hosted bucket endpoint, also the public URL base.
    pub fn bucket_endpoint(&self) -> String {
        format!("https://{}.{}.aliyuncs.com", self.bucket, self.region)
    }

    /// Region used for request signatures: OSS accepts the bare region id.
    pub fn signing_region(&self) -> &str {
        self.region.strip_prefix("oss-").unwrap_or(&self.region)
    }
}

/// Build the OSS-backed storage.
///
/// Requests are never retried inside the client: callers bound each call with a
/// deadline and degrade on failure.
pub fn oss_storage(settings: OssSettings) -> StorageResult<ObjectStoreStorage> {
    let retry = RetryConfig {
        max_retries: 0,
        ..Default::default()
    };

    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(settings.bucket.clone())
        .with_region(settings.signing_region())
        .with_access_key_id(settings.access_key_id.clone())
        .with_secret_access_key(settings.access_key_secret.clone())
        .with_retry(retry);

    builder = match settings.endpoint {
        Some(ref endpoint) => {
            let allow_http = endpoint.starts_with("http://");
            builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http)
        }
        None => builder
            .with_endpoint(settings.bucket_endpoint())
            .with_virtual_hosted_style_request(true),
    };

    let store = Arc::new(
        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?,
    );
    let signer: Arc<dyn Signer> = store.clone();

    tracing::info!(
        bucket = %settings.bucket,
        region = %settings.region,
        endpoint = ?settings.endpoint,
        "OSS storage initialized"
    );

    Ok(ObjectStoreStorage::new(
        store,
        StorageBackend::Oss,
        settings.bucket.clone(),
        PublicUrl::aliyun(&settings.bucket, &settings.region),
    )
    .with_signer(signer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectStorage;

    fn settings() -> OssSettings {
        OssSettings {
            bucket: "hymns".to_string(),
            region: "oss-cn-hangzhou".to_string(),
            access_key_id: "id".to_string(),
            access_key_secret: "secret".to_string(),
            endpoint: None,
        }
    }

    #[test]
    fn signing_region_drops_oss_prefix() {
        assert_eq!(settings().signing_region(), "cn-hangzhou");
        let mut other = settings();
        other.region = "cn-beijing".to_string();
        assert_eq!(other.signing_region(), "cn-beijing");
    }

    #[tokio::test]
    async fn builds_signing_storage_with_aliyun_public_urls() {
        let storage = oss_storage(settings()).unwrap();
        assert!(storage.supports_signing());
        assert_eq!(storage.backend_type(), StorageBackend::Oss);
        assert_eq!(
            storage.public_url("audio/grace.mp3"),
            "https://hymns.oss-cn-hangzhou.aliyuncs.com/audio/grace.mp3"
        );
    }
}
