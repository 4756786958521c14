//! Tubely Core Library
//!
//! Domain models, error types and configuration shared by the storage, processing,
//! database and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{BaseConfig, Config, IngestConfig, UploadPipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Video, VideoResponse};
pub use storage_types::StorageBackend;
