//! Application state shared by all handlers.

use std::sync::Arc;

use tubely_core::{Config, UploadPipelineConfig};
use tubely_db::VideoRepository;
use tubely_processing::{MediaProber, MediaRemuxer};
use tubely_storage::Storage;

/// Placement targets, tool adapters and ceilings used by the upload pipeline.
#[derive(Clone)]
pub struct MediaConfig {
    /// Object storage for processed videos.
    pub video_storage: Arc<dyn Storage>,
    /// Public local directory for thumbnails.
    pub thumbnail_storage: Arc<dyn Storage>,
    pub prober: Arc<dyn MediaProber>,
    pub remuxer: Arc<dyn MediaRemuxer>,
    pub pipeline: UploadPipelineConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub media: MediaConfig,
}
