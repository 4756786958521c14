//! Storage abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// An upload either leaves the complete object under the key and returns its public URL,
/// or fails; callers never observe a partially written object.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under an exact storage key and return the public URL.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Upload the full contents of a local file under `storage_key`.
    ///
    /// The default reads the file into memory; backends that can stream override it.
    async fn upload_file(
        &self,
        storage_key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.upload_with_key(storage_key, Bytes::from(data), content_type)
            .await
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
