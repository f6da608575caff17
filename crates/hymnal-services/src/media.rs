//! Media URL resolution: video and audio basenames to playable URLs.

use futures::future::join_all;
use hymnal_core::{AudioUrlMode, Config};
use hymnal_storage::keys::{basename, folder_prefix, has_video_extension, join_key, strip_folder};
use hymnal_storage::{with_deadline, ObjectStorage, PublicUrl};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub audio_prefix: String,
    pub video_prefix: String,
    pub drama_prefix: String,
    pub probe_timeout: Duration,
    pub listing_timeout: Duration,
    pub search_batch_size: usize,
    pub search_max_batches: usize,
    pub signed_url_ttl: Duration,
    pub video_probe_extensions: Vec<String>,
    /// Used when no object store is configured
    pub public_url: PublicUrl,
}

impl MediaSettings {
    pub fn from_config(config: &Config) -> Self {
        MediaSettings {
            audio_prefix: config.audio_prefix().to_string(),
            video_prefix: config.video_prefix().to_string(),
            drama_prefix: config.drama_prefix().to_string(),
            probe_timeout: config.probe_timeout(),
            listing_timeout: config.listing_timeout(),
            search_batch_size: config.search_batch_size(),
            search_max_batches: config.search_max_batches(),
            signed_url_ttl: config.signed_url_ttl(),
            video_probe_extensions: config.video_probe_extensions().to_vec(),
            public_url: PublicUrl::new(config.public_base_url()),
        }
    }
}

/// A drama episode resolved to a URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DramaVideo {
    pub name: String,
    pub key: String,
    pub url: String,
    /// Whether the key was found in the store
    pub verified: bool,
    pub signed: bool,
}

/// Resolves media basenames against the object store.
///
/// Every lookup degrades: when the store is missing, slow or failing the
/// caller gets the unverified conventional URL instead of an error.
#[derive(Clone)]
pub struct MediaResolver {
    storage: Option<Arc<dyn ObjectStorage>>,
    settings: MediaSettings,
}

impl MediaResolver {
    pub fn new(storage: Option<Arc<dyn ObjectStorage>>, settings: MediaSettings) -> Self {
        Self { storage, settings }
    }

    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }

    pub fn public_url(&self, key: &str) -> String {
        match &self.storage {
            Some(storage) => storage.public_url(key),
            None => self.settings.public_url.url_for(key),
        }
    }

    /// Playable URL for an event video: `.mp4` appended unless the basename has a video extension.
    pub fn video_url(&self, name: &str) -> String {
        if is_absolute(name) {
            return name.to_string();
        }
        self.public_url(&join_key(&self.settings.video_prefix, &video_file_name(name)))
    }

    /// Probe the candidate extensions concurrently and return the first existing one,
    /// in configured order.
    ///
    /// Each probe has its own deadline; a failed or slow probe does not cancel the others.
    pub async fn probe_video(&self, name: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;

        let candidates: Vec<String> = if has_video_extension(name) {
            vec![join_key(&self.settings.video_prefix, name)]
        } else {
            self.settings
                .video_probe_extensions
                .iter()
                .map(|ext| join_key(&self.settings.video_prefix, &format!("{}.{}", name, ext)))
                .collect()
        };

        let probes = candidates.iter().map(|key| {
            with_deadline(self.settings.probe_timeout, "video probe", storage.exists(key))
        });
        let results = join_all(probes).await;

        for (key, result) in candidates.iter().zip(results) {
            match result {
                Ok(true) => return Some(storage.public_url(key)),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, key = %key, "Video probe failed"),
            }
        }

        tracing::debug!(name = %name, "No video candidate found");
        None
    }

    /// Audio URL under the audio folder.
    ///
    /// `Signed` mode searches the folder for the basename and signs the key it
    /// finds; in fast mode the conventional key is signed without searching.
    /// Any failure yields the direct URL.
    pub async fn audio_url(&self, name: &str, mode: AudioUrlMode, fast: bool) -> String {
        if is_absolute(name) {
            return name.to_string();
        }

        let direct_key = join_key(&self.settings.audio_prefix, name);
        let Some(storage) = self.storage.as_ref() else {
            return self.public_url(&direct_key);
        };

        if mode == AudioUrlMode::Direct || !storage.supports_signing() {
            return storage.public_url(&direct_key);
        }

        let key = if fast {
            direct_key.clone()
        } else {
            self.find_by_basename(&self.settings.audio_prefix, name)
                .await
                .unwrap_or_else(|| direct_key.clone())
        };

        match storage.signed_url(&key, self.settings.signed_url_ttl).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Audio signing failed, using direct URL");
                storage.public_url(&direct_key)
            }
        }
    }

    /// Resolve a drama episode under the drama folder.
    pub async fn drama_video(&self, name: &str) -> DramaVideo {
        let name = name.trim();
        let assumed_key = join_key(&self.settings.drama_prefix, &video_file_name(name));

        let Some(storage) = self.storage.as_ref() else {
            return DramaVideo {
                name: name.to_string(),
                url: self.public_url(&assumed_key),
                key: assumed_key,
                verified: false,
                signed: false,
            };
        };

        let found = self.find_by_basename(&self.settings.drama_prefix, name).await;
        let verified = found.is_some();
        let key = found.unwrap_or(assumed_key);

        let (url, signed) = if storage.supports_signing() {
            match storage.signed_url(&key, self.settings.signed_url_ttl).await {
                Ok(url) => (url, true),
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Drama signing failed, using public URL");
                    (storage.public_url(&key), false)
                }
            }
        } else {
            (storage.public_url(&key), false)
        };

        DramaVideo {
            name: name.to_string(),
            key,
            url,
            verified,
            signed,
        }
    }

    /// Full key of the first object in `folder` whose name, with or without its
    /// extension, equals `name`.
    ///
    /// Scans in batches under the same cap as search; stops at the first hit.
    pub async fn find_by_basename(&self, folder: &str, name: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        let prefix = folder_prefix(folder);
        let wanted = basename(name);
        let mut marker: Option<String> = None;

        for _ in 0..self.settings.search_max_batches {
            let listing = match with_deadline(
                self.settings.listing_timeout,
                "basename search",
                storage.list(&prefix, marker.as_deref(), self.settings.search_batch_size),
            )
            .await
            {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!(error = %e, folder = %folder, name = %name, "Basename search failed");
                    return None;
                }
            };

            let hit = listing.objects.iter().find(|object| {
                strip_folder(&object.name, folder)
                    .map(|stripped| stripped == name || basename(stripped) == wanted)
                    .unwrap_or(false)
            });
            if let Some(object) = hit {
                return Some(object.name.clone());
            }

            if !listing.is_truncated {
                break;
            }
            marker = listing.next_marker;
        }

        None
    }
}

fn video_file_name(name: &str) -> String {
    if has_video_extension(name) {
        name.to_string()
    } else {
        format!("{}.{}", name, DEFAULT_VIDEO_EXTENSION)
    }
}

fn is_absolute(name: &str) -> bool {
    name.starts_with("http://") || name.starts_with("https://")
}
