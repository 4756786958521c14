//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_processing::{FfmpegRemuxer, FfprobeProber};

use crate::state::{AppState, MediaConfig};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_record_store(&config).await?;
    let (video_storage, thumbnail_storage) = storage::setup_storage(&config).await?;

    let timeout = config.external_tool_timeout();
    let prober = FfprobeProber::new(config.ffprobe_path().to_string(), timeout)
        .context("Invalid FFPROBE_PATH")?;
    let remuxer = FfmpegRemuxer::new(config.ffmpeg_path().to_string(), timeout)
        .context("Invalid FFMPEG_PATH")?;

    let state = Arc::new(AppState {
        media: MediaConfig {
            video_storage,
            thumbnail_storage,
            prober: Arc::new(prober),
            remuxer: Arc::new(remuxer),
            pipeline: config.pipeline(),
        },
        videos,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
