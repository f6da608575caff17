//! Configuration module
//!
//! This module provides configuration for the API and services: server settings,
//! object storage coordinates, catalog location and the timeouts and batch sizes
//! used by listing, search and detail resolution.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const LISTING_TIMEOUT_MS: u64 = 8000;
const PROBE_TIMEOUT_MS: u64 = 2000;
const SEARCH_BATCH_SIZE: usize = 1000;
const SEARCH_MAX_BATCHES: usize = 10;
const SIGNED_URL_TTL_SECS: u64 = 3600;

/// How `detail.audio` basenames are turned into URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioUrlMode {
    /// Build the public URL directly from the basename.
    #[default]
    Direct,
    /// Search the audio folder for the basename and return a signed URL.
    Signed,
}

impl FromStr for AudioUrlMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(AudioUrlMode::Direct),
            "signed" => Ok(AudioUrlMode::Signed),
            other => Err(anyhow::anyhow!("Invalid audio url mode: {}", other)),
        }
    }
}

/// Server configuration shared by every deployment
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Set when running inside the serverless host (`VERCEL` present).
    pub serverless: bool,
    pub max_upload_size_bytes: usize,
}

/// Content service configuration
#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub oss_region: Option<String>,
    pub oss_bucket: Option<String>,
    pub oss_access_key_id: Option<String>,
    pub oss_access_key_secret: Option<String>,
    pub oss_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Catalog configuration
    pub catalog_path: Option<String>,
    pub data_dir: String,
    // Logical folders inside the bucket
    pub image_prefix: String,
    pub audio_prefix: String,
    pub video_prefix: String,
    pub drama_prefix: String,
    // Listing / search / detail tuning
    pub listing_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub search_batch_size: usize,
    pub search_max_batches: usize,
    pub signed_url_ttl_secs: u64,
    pub audio_url_mode: AudioUrlMode,
    pub video_probe_extensions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        ContentConfig {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                serverless: false,
                max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            },
            storage_backend: StorageBackend::Oss,
            oss_region: None,
            oss_bucket: None,
            oss_access_key_id: None,
            oss_access_key_secret: None,
            oss_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            catalog_path: None,
            data_dir: "api".to_string(),
            image_prefix: "hymn-image".to_string(),
            audio_prefix: "audio".to_string(),
            video_prefix: "video".to_string(),
            drama_prefix: "drama".to_string(),
            listing_timeout_ms: LISTING_TIMEOUT_MS,
            probe_timeout_ms: PROBE_TIMEOUT_MS,
            search_batch_size: SEARCH_BATCH_SIZE,
            search_max_batches: SEARCH_MAX_BATCHES,
            signed_url_ttl_secs: SIGNED_URL_TTL_SECS,
            audio_url_mode: AudioUrlMode::Direct,
            video_probe_extensions: vec!["mp4".to_string(), "mov".to_string()],
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ContentConfig>);

impl From<ContentConfig> for Config {
    fn from(config: ContentConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    fn as_content(&self) -> &ContentConfig {
        &self.0
    }

    /// Production mode: `ENVIRONMENT=production|prod`, or running on the serverless host.
    pub fn is_production(&self) -> bool {
        let environment = self.as_content().base.environment.to_lowercase();
        environment == "production" || environment == "prod" || self.as_content().base.serverless
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ContentConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_content().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_content().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_content().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_content().base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_content().base.max_upload_size_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_content().storage_backend
    }

    pub fn oss_region(&self) -> Option<&str> {
        self.as_content().oss_region.as_deref()
    }

    pub fn oss_bucket(&self) -> Option<&str> {
        self.as_content().oss_bucket.as_deref()
    }

    pub fn oss_access_key_id(&self) -> Option<&str> {
        self.as_content().oss_access_key_id.as_deref()
    }

    pub fn oss_access_key_secret(&self) -> Option<&str> {
        self.as_content().oss_access_key_secret.as_deref()
    }

    pub fn oss_endpoint(&self) -> Option<&str> {
        self.as_content().oss_endpoint.as_deref()
    }

    /// All four OSS variables are present.
    pub fn oss_configured(&self) -> bool {
        self.oss_region().is_some()
            && self.oss_bucket().is_some()
            && self.oss_access_key_id().is_some()
            && self.oss_access_key_secret().is_some()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_content().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_content().local_storage_base_url.as_deref()
    }

    /// Base of every public object URL.
    ///
    /// For OSS this is `https://<bucket>.<region>.aliyuncs.com` and only needs the
    /// bucket and region, so catalog-derived listings still carry usable URLs for
    /// a public bucket when credentials are absent. Empty when nothing is known,
    /// which yields root-relative URLs.
    pub fn public_base_url(&self) -> String {
        match self.storage_backend() {
            StorageBackend::Oss => match (self.oss_bucket(), self.oss_region()) {
                (Some(bucket), Some(region)) => format!("https://{}.{}.aliyuncs.com", bucket, region),
                _ => String::new(),
            },
            StorageBackend::Local | StorageBackend::Memory => self
                .local_storage_base_url()
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}/media", self.server_port())),
        }
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.as_content().catalog_path.as_deref()
    }

    pub fn data_dir(&self) -> &str {
        &self.as_content().data_dir
    }

    pub fn image_prefix(&self) -> &str {
        &self.as_content().image_prefix
    }

    pub fn audio_prefix(&self) -> &str {
        &self.as_content().audio_prefix
    }

    pub fn video_prefix(&self) -> &str {
        &self.as_content().video_prefix
    }

    pub fn drama_prefix(&self) -> &str {
        &self.as_content().drama_prefix
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_millis(self.as_content().listing_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.as_content().probe_timeout_ms)
    }

    pub fn search_batch_size(&self) -> usize {
        self.as_content().search_batch_size
    }

    pub fn search_max_batches(&self) -> usize {
        self.as_content().search_max_batches
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.as_content().signed_url_ttl_secs)
    }

    pub fn audio_url_mode(&self) -> AudioUrlMode {
        self.as_content().audio_url_mode
    }

    pub fn video_probe_extensions(&self) -> &[String] {
        &self.as_content().video_probe_extensions
    }
}

impl ContentConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = ContentConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            serverless: env::var("VERCEL").is_ok(),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Oss,
        };

        let audio_url_mode = match env::var("AUDIO_URL_MODE") {
            Ok(value) => value.parse::<AudioUrlMode>()?,
            Err(_) => AudioUrlMode::Direct,
        };

        let config = ContentConfig {
            base,
            storage_backend,
            oss_region: non_empty_var("OSS_REGION"),
            oss_bucket: non_empty_var("OSS_BUCKET"),
            oss_access_key_id: non_empty_var("ALIBABA_CLOUD_ACCESS_KEY_ID"),
            oss_access_key_secret: non_empty_var("ALIBABA_CLOUD_ACCESS_KEY_SECRET"),
            oss_endpoint: non_empty_var("OSS_ENDPOINT"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            catalog_path: non_empty_var("CATALOG_PATH"),
            data_dir: env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            image_prefix: prefix_var("IMAGE_PREFIX", defaults.image_prefix),
            audio_prefix: prefix_var("AUDIO_PREFIX", defaults.audio_prefix),
            video_prefix: prefix_var("VIDEO_PREFIX", defaults.video_prefix),
            drama_prefix: prefix_var("DRAMA_PREFIX", defaults.drama_prefix),
            listing_timeout_ms: env::var("LISTING_TIMEOUT_MS")
                .unwrap_or_else(|_| LISTING_TIMEOUT_MS.to_string())
                .parse()
                .unwrap_or(LISTING_TIMEOUT_MS),
            probe_timeout_ms: env::var("PROBE_TIMEOUT_MS")
                .unwrap_or_else(|_| PROBE_TIMEOUT_MS.to_string())
                .parse()
                .unwrap_or(PROBE_TIMEOUT_MS),
            search_batch_size: env::var("SEARCH_BATCH_SIZE")
                .unwrap_or_else(|_| SEARCH_BATCH_SIZE.to_string())
                .parse()
                .unwrap_or(SEARCH_BATCH_SIZE),
            search_max_batches: env::var("SEARCH_MAX_BATCHES")
                .unwrap_or_else(|_| SEARCH_MAX_BATCHES.to_string())
                .parse()
                .unwrap_or(SEARCH_MAX_BATCHES),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_SECS),
            audio_url_mode,
            video_probe_extensions: env::var("VIDEO_PROBE_EXTENSIONS")
                .map(|s| {
                    s.split(',')
                        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                        .filter(|ext| !ext.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.video_probe_extensions),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.search_batch_size == 0 {
            return Err(anyhow::anyhow!("SEARCH_BATCH_SIZE must be greater than 0"));
        }

        if self.search_max_batches == 0 {
            return Err(anyhow::anyhow!("SEARCH_MAX_BATCHES must be greater than 0"));
        }

        if self.listing_timeout_ms == 0 || self.probe_timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "LISTING_TIMEOUT_MS and PROBE_TIMEOUT_MS must be greater than 0"
            ));
        }

        if self.video_probe_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_PROBE_EXTENSIONS must name at least one extension"
            ));
        }

        // OSS credentials are optional: without them listing degrades to the catalog.
        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Folder variables are stored without surrounding slashes.
fn prefix_var(name: &str, default: String) -> String {
    env::var(name)
        .map(|s| s.trim().trim_matches('/').to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}
