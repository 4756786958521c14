//! In-process stand-ins for ffprobe, ffmpeg, object storage and the record store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tubely_core::{AppError, StorageBackend, Video};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::video::faststart_output_path;
use tubely_processing::{
    MediaProber, MediaRemuxer, ProcessingError, ProcessingResult, VideoMetadata,
};
use tubely_storage::{Storage, StorageError, StorageResult};
use uuid::Uuid;

/// Prefix the fake remuxer puts in front of the staged bytes.
pub const REMUX_MARKER: &[u8] = b"faststart:";

/// Reports fixed dimensions, or fails like an ffprobe that exits nonzero.
pub struct FakeProber {
    result: Option<VideoMetadata>,
}

impl FakeProber {
    pub fn dimensions(width: u32, height: u32) -> Self {
        Self {
            result: Some(VideoMetadata { width, height }),
        }
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, path: &Path) -> ProcessingResult<VideoMetadata> {
        assert!(path.exists(), "probe called on missing file {}", path.display());
        self.result.ok_or_else(|| ProcessingError::ToolFailed {
            tool: "ffprobe".to_string(),
            status: "exit status: 1".to_string(),
            stderr: format!("{}: Invalid data found when processing input", path.display()),
        })
    }
}

/// Writes `REMUX_MARKER + input` to the path ffmpeg would produce.
pub struct FakeRemuxer;

#[async_trait]
impl MediaRemuxer for FakeRemuxer {
    async fn remux(&self, input: &Path) -> ProcessingResult<PathBuf> {
        let mut data = REMUX_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        let output = faststart_output_path(input);
        tokio::fs::write(&output, data).await?;
        Ok(output)
    }
}

/// Leaves a half-written output behind, then fails like an ffmpeg that exits nonzero.
pub struct FailingRemuxer;

#[async_trait]
impl MediaRemuxer for FailingRemuxer {
    async fn remux(&self, input: &Path) -> ProcessingResult<PathBuf> {
        let output = faststart_output_path(input);
        tokio::fs::write(&output, b"ftyp-truncated").await?;
        Err(ProcessingError::ToolFailed {
            tool: "ffmpeg".to_string(),
            status: "exit status: 1".to_string(),
            stderr: format!("{}: moov atom not found", input.display()),
        })
    }
}

/// Video storage whose every upload fails.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(format!(
            "PutObject {} failed: service unavailable",
            storage_key
        )))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Reads from the wrapped store; every update fails.
pub struct FailingUpdates(pub Arc<InMemoryVideoRepository>);

#[async_trait]
impl VideoRepository for FailingUpdates {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.0.get_video(id).await
    }

    async fn update_video(&self, _video: &Video) -> Result<(), AppError> {
        Err(AppError::Database("connection reset by peer".to_string()))
    }
}

/// `TestAppOptions::wrap_videos` hook installing [`FailingUpdates`].
pub fn failing_updates(repo: Arc<InMemoryVideoRepository>) -> Arc<dyn VideoRepository> {
    Arc::new(FailingUpdates(repo))
}
