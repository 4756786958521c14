//! Tubely Storage Library
//!
//! Storage abstraction plus the two backends the ingestion service places assets in:
//! S3 (through `object_store`) for videos and a local public directory for thumbnails.
//!
//! # Storage key format
//!
//! - **Videos**: `{aspect-bucket}/{64 hex chars}.mp4`, e.g. `widescreen/9f1c…e2.mp4`
//! - **Thumbnails**: `{video_id}.{ext}`, so a re-upload replaces the previous file
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in [`keys`].

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::{create_thumbnail_storage, create_video_storage};
pub use keys::{thumbnail_storage_key, video_storage_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
