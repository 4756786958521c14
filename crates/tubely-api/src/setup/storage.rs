//! Storage setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_storage::{create_thumbnail_storage, create_video_storage, Storage};

/// Video object storage and thumbnail public storage, in that order.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    tracing::info!("Initializing storage...");

    let video_storage = create_video_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    let thumbnail_storage = create_thumbnail_storage(config)
        .await
        .context("Failed to initialize thumbnail storage")?;

    tracing::info!(
        video_backend = %video_storage.backend_type(),
        thumbnail_backend = %thumbnail_storage.backend_type(),
        bucket = %config.s3_bucket(),
        assets_root = %config.assets_root().display(),
        "Storage initialized successfully"
    );

    Ok((video_storage, thumbnail_storage))
}
