use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::aspect::AspectBucket;
use super::command::{run_tool, validate_tool_path};
use crate::error::{ProcessingError, ProcessingResult};

/// Geometry of the primary video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
}

impl VideoMetadata {
    pub fn aspect_bucket(&self) -> AspectBucket {
        AspectBucket::from_dimensions(self.width, self.height)
    }
}

/// Inspects a staged video file.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> ProcessingResult<VideoMetadata>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Picks the first stream with `codec_type == "video"`, or the first stream that reports
/// dimensions when no codec types are present.
pub fn parse_ffprobe_output(stdout: &[u8]) -> ProcessingResult<VideoMetadata> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::MalformedOutput(e.to_string()))?;

    if output.streams.is_empty() {
        return Err(ProcessingError::NoVideoStream);
    }

    let stream = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .or_else(|| {
            output
                .streams
                .iter()
                .find(|s| s.codec_type.is_none() && s.width.is_some() && s.height.is_some())
        })
        .ok_or(ProcessingError::NoVideoStream)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(VideoMetadata { width, height })
        }
        (width, height) => Err(ProcessingError::InvalidDimensions {
            width: width.unwrap_or(0),
            height: height.unwrap_or(0),
        }),
    }
}

/// [`MediaProber`] backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: String, timeout: Option<Duration>) -> ProcessingResult<Self> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> ProcessingResult<VideoMetadata> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = run_tool("ffprobe", command, self.timeout).await?;
        let metadata = parse_ffprobe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            width = metadata.width,
            height = metadata.height,
            bucket = %metadata.aspect_bucket(),
            "Video probe completed"
        );

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_picks_video_stream() {
        let json = br#"{"streams":[
            {"index":0,"codec_type":"audio","codec_name":"aac"},
            {"index":1,"codec_type":"video","codec_name":"h264","width":1920,"height":1080}
        ]}"#;
        let metadata = parse_ffprobe_output(json).unwrap();
        assert_eq!(metadata, VideoMetadata { width: 1920, height: 1080 });
        assert_eq!(metadata.aspect_bucket(), AspectBucket::Widescreen);
    }

    #[test]
    fn test_parse_without_codec_types() {
        let json = br#"{"streams":[{"width":1080,"height":1920}]}"#;
        let metadata = parse_ffprobe_output(json).unwrap();
        assert_eq!(metadata.aspect_bucket(), AspectBucket::Vertical);
    }

    #[test]
    fn test_parse_zero_streams() {
        assert!(matches!(
            parse_ffprobe_output(br#"{"streams":[]}"#),
            Err(ProcessingError::NoVideoStream)
        ));
    }

    #[test]
    fn test_parse_audio_only() {
        let json = br#"{"streams":[{"codec_type":"audio"}]}"#;
        assert!(matches!(
            parse_ffprobe_output(json),
            Err(ProcessingError::NoVideoStream)
        ));
    }

    #[test]
    fn test_parse_malformed_output() {
        assert!(matches!(
            parse_ffprobe_output(b"not json"),
            Err(ProcessingError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_ffprobe_output(br#"{"format":{}}"#),
            Err(ProcessingError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_parse_zero_dimensions() {
        let json = br#"{"streams":[{"codec_type":"video","width":1920,"height":0}]}"#;
        assert!(matches!(
            parse_ffprobe_output(json),
            Err(ProcessingError::InvalidDimensions { width: 1920, height: 0 })
        ));
    }

    #[test]
    fn test_rejects_unsafe_tool_path() {
        assert!(FfprobeProber::new("ffprobe | sh".to_string(), None).is_err());
    }

    #[cfg(unix)]
    mod fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_ffprobe(dir: &Path, script: &str) -> String {
            let path = dir.join("ffprobe");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[tokio::test]
        async fn test_probe_reads_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_ffprobe(
                dir.path(),
                r#"echo '{"streams":[{"codec_type":"video","width":1080,"height":1920}]}'"#,
            );
            let prober = FfprobeProber::new(bin, None).unwrap();
            let metadata = prober.probe(Path::new("/tmp/input.mp4")).await.unwrap();
            assert_eq!(metadata.aspect_bucket(), AspectBucket::Vertical);
        }

        #[tokio::test]
        async fn test_probe_garbage_output() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_ffprobe(dir.path(), "echo 'Segmentation fault'");
            let prober = FfprobeProber::new(bin, None).unwrap();
            let result = prober.probe(Path::new("/tmp/input.mp4")).await;
            assert!(matches!(result, Err(ProcessingError::MalformedOutput(_))));
        }

        #[tokio::test]
        async fn test_probe_crash() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_ffprobe(dir.path(), "echo 'Invalid data found' >&2; exit 1");
            let prober = FfprobeProber::new(bin, None).unwrap();
            let result = prober.probe(Path::new("/tmp/input.mp4")).await;
            assert!(matches!(result, Err(ProcessingError::ToolFailed { .. })));
        }

        #[tokio::test]
        async fn test_probe_hang_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_ffprobe(dir.path(), "sleep 30");
            let prober = FfprobeProber::new(bin, Some(Duration::from_millis(200))).unwrap();
            let result = prober.probe(Path::new("/tmp/input.mp4")).await;
            assert!(matches!(result, Err(ProcessingError::TimedOut { .. })));
        }
    }
}
