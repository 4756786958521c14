use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage for publicly served assets
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL under which `base_path` is served (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a path inside `base_path`.
    ///
    /// Keys are flat file names; separators and traversal sequences are rejected.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.contains('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    /// Writes to a sibling temp file first and renames it over the target, so an
    /// existing asset under the same key is replaced atomically.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let tmp_path = self
            .base_path
            .join(format!(".{}.{}.partial", storage_key, uuid::Uuid::new_v4()));
        let size = data.len();
        let start = std::time::Instant::now();

        let write_result: std::io::Result<()> = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, &path).await
        }
        .await;

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path).await;
            tracing::error!(
                error = %e,
                path = %path.display(),
                key = %storage_key,
                size_bytes = size,
                "Local storage upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        let url = self.generate_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
