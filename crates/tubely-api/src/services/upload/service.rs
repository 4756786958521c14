//! Upload pipeline for thumbnails and videos
//!
//! thumbnail: read → classify → place → record
//! video:     classify → stage → probe → remux → place → record
//!
//! Callers must have run the owner check first; the services never look at credentials.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Multipart;
use tubely_core::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use tubely_core::Video;
use tubely_processing::AssetKind;
use tubely_storage::{thumbnail_storage_key, video_storage_key};

use super::ingress;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Name of the staged original inside its per-request directory.
const STAGED_VIDEO_NAME: &str = "tubely-upload.mp4";

pub struct MediaUploadService {
    state: Arc<AppState>,
}

impl MediaUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Store a thumbnail for `video` and record its public URL.
    ///
    /// A re-upload with the same extension replaces the previous file in place.
    #[tracing::instrument(skip_all, fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn upload_thumbnail(
        &self,
        video: Video,
        mut multipart: Multipart,
    ) -> Result<Video, HttpAppError> {
        let media = &self.state.media;

        let (class, data) = ingress::read_field_to_memory(
            &mut multipart,
            THUMBNAIL_FIELD,
            AssetKind::Thumbnail,
            media.pipeline.max_thumbnail_size_bytes,
        )
        .await?;

        let size_bytes = data.len();
        let storage_key = thumbnail_storage_key(video.id, class.extension);
        let url = media
            .thumbnail_storage
            .upload_with_key(&storage_key, data, class.content_type)
            .await?;

        tracing::info!(
            storage_key = %storage_key,
            size_bytes,
            content_type = class.content_type,
            "Thumbnail placed"
        );

        self.record_placement(video.with_thumbnail_url(url), &storage_key)
            .await
    }

    /// Stage, probe and fast-start remux a video, then place it in object storage under
    /// its aspect bucket and record the URL.
    ///
    /// The staging directory (original and remuxed artifact) is removed when this returns,
    /// whatever the outcome.
    #[tracing::instrument(skip_all, fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn upload_video(
        &self,
        video: Video,
        mut multipart: Multipart,
    ) -> Result<Video, HttpAppError> {
        let start = Instant::now();
        let media = &self.state.media;

        let upload = ingress::stage_field(
            &mut multipart,
            VIDEO_FIELD,
            AssetKind::Video,
            media.pipeline.max_video_size_bytes,
            &media.pipeline.staging_dir,
            STAGED_VIDEO_NAME,
        )
        .await?;

        let metadata = media.prober.probe(upload.file.path()).await?;
        let bucket = metadata.aspect_bucket();
        tracing::debug!(
            width = metadata.width,
            height = metadata.height,
            aspect_bucket = %bucket,
            staging_dir = %upload.area.path().display(),
            "Video probed"
        );

        let processed = media.remuxer.remux(upload.file.path()).await?;

        let storage_key = video_storage_key(bucket.label());
        let url = media
            .video_storage
            .upload_file(&storage_key, &processed, upload.class.content_type)
            .await?;

        tracing::info!(
            storage_key = %storage_key,
            size_bytes = upload.file.size(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Video placed"
        );

        self.record_placement(video.with_video_url(url), &storage_key)
            .await
    }

    /// Persist the new URL. A failure here leaves the placed object orphaned; it is logged
    /// with its key for out-of-band reconciliation and not deleted.
    async fn record_placement(
        &self,
        video: Video,
        storage_key: &str,
    ) -> Result<Video, HttpAppError> {
        if let Err(err) = self.state.videos.update_video(&video).await {
            tracing::error!(
                video_id = %video.id,
                storage_key = %storage_key,
                error = %err,
                "Record update failed after placement; asset is orphaned"
            );
            return Err(err.into());
        }
        Ok(video)
    }
}
