//! Detail Resolution Service

use crate::media::MediaResolver;
use hymnal_catalog::CatalogRepository;
use hymnal_core::models::{HymnDetail, HymnDetailData, HymnDetailResponse};
use hymnal_core::{AppError, AppResult, AudioUrlMode, Config};
use std::sync::Arc;

/// Attached to `video_file` when its extension was assumed rather than checked.
pub const FAST_MODE_VIDEO_NOTE: &str =
    "Fast mode: video extension assumed (.mp4) without verifying the object exists";

#[derive(Debug, Clone)]
pub struct DetailSettings {
    pub image_prefix: String,
    pub audio_url_mode: AudioUrlMode,
    /// Production deployments always skip verification
    pub production: bool,
}

impl DetailSettings {
    pub fn from_config(config: &Config) -> Self {
        DetailSettings {
            image_prefix: config.image_prefix().to_string(),
            audio_url_mode: config.audio_url_mode(),
            production: config.is_production(),
        }
    }
}

#[derive(Clone)]
pub struct HymnDetailService {
    catalog: Arc<dyn CatalogRepository>,
    media: MediaResolver,
    settings: DetailSettings,
}

impl HymnDetailService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        media: MediaResolver,
        settings: DetailSettings,
    ) -> Self {
        Self {
            catalog,
            media,
            settings,
        }
    }

    /// Resolve one catalog entry and its media.
    ///
    /// Sub-resource failures never fail the request: unresolved basenames are
    /// returned as stored.
    #[tracing::instrument(skip(self), fields(operation = "hymn_detail"))]
    pub async fn get_detail(&self, id: &str, fast: bool) -> AppResult<HymnDetailResponse> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidInput("Hymn ID is required".to_string()));
        }

        let entry = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hymn not found: {}", id)))?;

        let fast_mode = fast || self.settings.production;
        let mut detail = entry.detail.clone().unwrap_or_default();
        self.resolve_videos(&mut detail, fast_mode).await;

        // A blank basename is passed through untouched
        if let Some(audio) = detail.audio.as_mut().filter(|a| !a.trim().is_empty()) {
            *audio = self
                .media
                .audio_url(audio.as_str(), self.settings.audio_url_mode, fast_mode)
                .await;
        }

        let url = self
            .media
            .public_url(&entry.object_key(&self.settings.image_prefix));

        Ok(HymnDetailResponse {
            success: true,
            data: HymnDetailData {
                id: entry.id,
                filename: entry.filename,
                index: entry.index,
                file_type: entry.file_type,
                tag: entry.tag,
                url,
                detail,
            },
            fast_mode,
        })
    }

    async fn resolve_videos(&self, detail: &mut HymnDetail, fast_mode: bool) {
        if let Some(events) = detail.events.as_mut() {
            for event in events.iter_mut() {
                if let Some(videos) = &event.videos {
                    event.video_urls =
                        Some(videos.iter().map(|v| self.media.video_url(v)).collect());
                }
            }
            return;
        }

        let Some(video_file) = detail.video_file.clone() else {
            return;
        };

        if fast_mode {
            detail.video_file = Some(self.media.video_url(&video_file));
            detail.video_file_note = Some(FAST_MODE_VIDEO_NOTE.to_string());
            detail.video_file_verified = Some(false);
            return;
        }

        match self.media.probe_video(&video_file).await {
            Some(url) => {
                detail.video_file = Some(url);
                detail.video_file_verified = Some(true);
            }
            None => {
                tracing::warn!(video_file = %video_file, "Legacy video not resolved, keeping basename");
            }
        }
    }
}
