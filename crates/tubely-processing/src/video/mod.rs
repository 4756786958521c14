//! Video inspection and normalization.
//!
//! Both external tools sit behind narrow traits ([`MediaProber`], [`MediaRemuxer`]) so the
//! upload pipeline can run against in-process fakes.

mod aspect;
mod command;
mod probe;
mod remux;

pub use aspect::AspectBucket;
pub use probe::{parse_ffprobe_output, FfprobeProber, MediaProber, VideoMetadata};
pub use remux::{faststart_output_path, FfmpegRemuxer, MediaRemuxer};
