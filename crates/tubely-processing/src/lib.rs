//! Tubely media processing
//!
//! Everything between "the request body is accepted" and "the artifact is ready to be
//! placed": declared-type classification, per-request staging on disk, and the ffprobe
//! and ffmpeg adapters used for video uploads.

pub mod classifier;
pub mod error;
pub mod staging;
pub mod video;

pub use classifier::{classify, normalize_mime_type, AssetKind, MediaClass, ValidationError};
pub use error::{ProcessingError, ProcessingResult};
pub use staging::{StagedFile, StagingArea, StagingWriter};
pub use video::{
    AspectBucket, FfmpegRemuxer, FfprobeProber, MediaProber, MediaRemuxer, VideoMetadata,
};
