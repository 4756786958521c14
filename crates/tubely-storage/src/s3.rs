use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ObjectStore, PutMultipartOptions, PutOptions, PutPayload,
    Result as ObjectResult, WriteMultipart,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;

/// Files above this size are streamed as a multipart upload instead of a single put.
pub const MULTIPART_THRESHOLD: u64 = 8 * 1024 * 1024;
const MAX_CONCURRENT_PARTS: usize = 4;
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    ///
    /// Credentials are taken from the standard `AWS_*` environment variables.
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket, region, endpoint_url))
    }

    /// Wrap an already configured object store. URLs are still composed from
    /// `bucket`, `region` and `endpoint_url`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        }
    }

    fn location(storage_key: &str) -> StorageResult<Path> {
        Path::parse(storage_key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }

    fn content_type_attributes(content_type: &str) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes
    }

    /// Stream `file` into a multipart upload. On any failure the upload is aborted so no
    /// parts are left behind.
    async fn upload_multipart(
        &self,
        storage_key: &str,
        file: &mut tokio::fs::File,
        content_type: &str,
    ) -> StorageResult<u64> {
        let location = Self::location(storage_key)?;
        let opts = PutMultipartOptions {
            attributes: Self::content_type_attributes(content_type),
            ..Default::default()
        };
        let upload = self
            .store
            .put_multipart_opts(&location, opts)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut writer = WriteMultipart::new(upload);

        let copied: StorageResult<u64> = async {
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];
            let mut total = 0u64;
            loop {
                writer
                    .wait_for_capacity(MAX_CONCURRENT_PARTS)
                    .await
                    .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
                let read = file.read(&mut buffer).await.map_err(|e| {
                    StorageError::UploadFailed(format!("Failed to read upload source: {}", e))
                })?;
                if read == 0 {
                    return Ok(total);
                }
                writer.write(&buffer[..read]);
                total += read as u64;
            }
        }
        .await;

        let total = match copied {
            Ok(total) => total,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort multipart upload"
                    );
                }
                return Err(e);
            }
        };

        writer
            .finish()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(total)
    }

    /// Generate public URL for S3 object
    ///
    /// AWS: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// Custom endpoints use path-style: `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let location = Self::location(storage_key)?;
        let size = data.len() as u64;
        let start = Instant::now();

        let opts = PutOptions {
            attributes: Self::content_type_attributes(content_type),
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    /// Small artifacts go through a single put; larger ones are streamed in parts so
    /// memory stays bounded regardless of file size.
    async fn upload_file(
        &self,
        storage_key: &str,
        path: &std::path::Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?
            .len();

        if size <= MULTIPART_THRESHOLD {
            let mut data = Vec::with_capacity(size as usize);
            file.read_to_end(&mut data).await.map_err(|e| {
                StorageError::UploadFailed(format!("Failed to read {}: {}", path.display(), e))
            })?;
            return self
                .upload_with_key(storage_key, Bytes::from(data), content_type)
                .await;
        }

        let start = Instant::now();
        let uploaded = self
            .upload_multipart(storage_key, &mut file, content_type)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 multipart upload failed"
                );
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = uploaded,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::ObjectStoreExt;

    fn in_memory(endpoint: Option<&str>) -> (Arc<InMemory>, S3Storage) {
        let store = Arc::new(InMemory::new());
        let storage = S3Storage::with_store(
            store.clone(),
            "tubely-videos".to_string(),
            "us-east-2".to_string(),
            endpoint.map(String::from),
        );
        (store, storage)
    }

    async fn stored_object(store: &InMemory, key: &str) -> (Option<String>, Bytes) {
        let result = store.get(&Path::from(key)).await.unwrap();
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());
        (content_type, result.bytes().await.unwrap())
    }

    #[tokio::test]
    async fn test_upload_returns_virtual_hosted_url() {
        let (_, storage) = in_memory(None);
        let url = storage
            .upload_with_key("widescreen/abc.mp4", Bytes::from_static(b"moov"), "video/mp4")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://tubely-videos.s3.us-east-2.amazonaws.com/widescreen/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_custom_endpoint_uses_path_style() {
        let (_, storage) = in_memory(Some("http://localhost:9000/"));
        let url = storage
            .upload_with_key("vertical/abc.mp4", Bytes::from_static(b"moov"), "video/mp4")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:9000/tubely-videos/vertical/abc.mp4");
    }

    #[tokio::test]
    async fn test_upload_stores_bytes_and_content_type() {
        let (store, storage) = in_memory(None);
        storage
            .upload_with_key("other/xyz.mp4", Bytes::from_static(b"payload"), "video/mp4")
            .await
            .unwrap();

        let (content_type, data) = stored_object(&store, "other/xyz.mp4").await;
        assert_eq!(content_type.as_deref(), Some("video/mp4"));
        assert_eq!(data.as_ref(), b"payload");
    }

    #[tokio::test]
    async fn test_upload_file_below_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.mp4");
        tokio::fs::write(&path, vec![7u8; 64 * 1024]).await.unwrap();

        let (store, storage) = in_memory(None);
        storage
            .upload_file("widescreen/file.mp4", &path, "video/mp4")
            .await
            .unwrap();

        let (content_type, data) = stored_object(&store, "widescreen/file.mp4").await;
        assert_eq!(content_type.as_deref(), Some("video/mp4"));
        assert_eq!(data.len(), 64 * 1024);
    }

    #[tokio::test]
    async fn test_upload_file_above_threshold_is_streamed_in_parts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.mp4");
        let len = MULTIPART_THRESHOLD as usize + 3 * READ_BUFFER_SIZE + 17;
        let original: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(&path, &original).await.unwrap();

        let (store, storage) = in_memory(None);
        let url = storage
            .upload_file("vertical/large.mp4", &path, "video/mp4")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://tubely-videos.s3.us-east-2.amazonaws.com/vertical/large.mp4"
        );

        let (content_type, data) = stored_object(&store, "vertical/large.mp4").await;
        assert_eq!(content_type.as_deref(), Some("video/mp4"));
        assert_eq!(data.len(), len);
        assert!(data.as_ref() == original.as_slice());
    }

    #[tokio::test]
    async fn test_upload_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let (_, storage) = in_memory(None);
        let result = storage
            .upload_file("other/missing.mp4", &dir.path().join("gone.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let (_, storage) = in_memory(None);
        let result = storage
            .upload_with_key("a//b.mp4", Bytes::from_static(b"x"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
