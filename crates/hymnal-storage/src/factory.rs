use crate::backend::ObjectStoreStorage;
use crate::keys::PublicUrl;
use crate::local::local_storage;
use crate::oss::{oss_storage, OssSettings};
use crate::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use hymnal_core::Config;
use object_store::memory::InMemory;
use std::sync::Arc;

/// Create a storage backend based on configuration
///
/// OSS needs all four of bucket, region, key id and secret; anything less is a
/// `ConfigError` the caller turns into catalog-only mode.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend() {
        StorageBackend::Oss => {
            let missing = |name: &str| StorageError::ConfigError(format!("{} not configured", name));
            let settings = OssSettings {
                bucket: config
                    .oss_bucket()
                    .map(String::from)
                    .ok_or_else(|| missing("OSS_BUCKET"))?,
                region: config
                    .oss_region()
                    .map(String::from)
                    .ok_or_else(|| missing("OSS_REGION"))?,
                access_key_id: config
                    .oss_access_key_id()
                    .map(String::from)
                    .ok_or_else(|| missing("ALIBABA_CLOUD_ACCESS_KEY_ID"))?,
                access_key_secret: config
                    .oss_access_key_secret()
                    .map(String::from)
                    .ok_or_else(|| missing("ALIBABA_CLOUD_ACCESS_KEY_SECRET"))?,
                endpoint: config.oss_endpoint().map(String::from),
            };

            let storage = oss_storage(settings)?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;

            let storage = local_storage(base_path, config.public_base_url()).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => Ok(Arc::new(memory_storage(PublicUrl::new(
            config.public_base_url(),
        )))),
    }
}

/// In-memory storage, empty at start
pub fn memory_storage(public_url: PublicUrl) -> ObjectStoreStorage {
    ObjectStoreStorage::new(
        Arc::new(InMemory::new()),
        StorageBackend::Memory,
        "memory",
        public_url,
    )
}
