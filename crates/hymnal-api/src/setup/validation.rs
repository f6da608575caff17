//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use hymnal_core::{Config, StorageBackend};

/// Validate configuration values
///
/// Structural problems fail startup; settings that only degrade behaviour
/// (missing OSS credentials, permissive CORS in production) are logged.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS allows all origins in production");
    }

    if config.storage_backend() == StorageBackend::Oss && !config.oss_configured() {
        tracing::warn!(
            "OSS_REGION, OSS_BUCKET or Alibaba Cloud credentials missing - listings will use the catalog"
        );
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
    }

    if config.listing_timeout() < config.probe_timeout() {
        tracing::warn!(
            listing_timeout_ms = config.listing_timeout().as_millis() as u64,
            probe_timeout_ms = config.probe_timeout().as_millis() as u64,
            "Listing timeout is shorter than the probe timeout"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hymnal_core::ContentConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::from(ContentConfig::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_upload_limit_is_rejected() {
        let mut content = ContentConfig::default();
        content.base.max_upload_size_bytes = 0;
        assert!(validate_config(&Config::from(content)).is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let content = ContentConfig {
            storage_backend: StorageBackend::Local,
            ..ContentConfig::default()
        };
        assert!(validate_config(&Config::from(content)).is_err());
    }
}
