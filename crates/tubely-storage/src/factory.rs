#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageResult};
#[cfg(not(all(feature = "storage-s3", feature = "storage-local")))]
use crate::StorageError;
use std::sync::Arc;
use tubely_core::Config;

/// Create the object storage backend that processed videos are placed in.
#[cfg(feature = "storage-s3")]
pub async fn create_video_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = S3Storage::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(String::from),
    )?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-s3"))]
pub async fn create_video_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
    ))
}

/// Create the local public storage that thumbnails are written to.
#[cfg(feature = "storage-local")]
pub async fn create_thumbnail_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.assets_root().clone(), config.assets_base_url()).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
pub async fn create_thumbnail_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
