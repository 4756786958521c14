use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::command::{run_tool, validate_tool_path};
use crate::error::{ProcessingError, ProcessingResult};

const FASTSTART_SUFFIX: &str = ".processing";

/// Rewrites a staged video so its metadata precedes the media data.
#[async_trait]
pub trait MediaRemuxer: Send + Sync {
    /// Returns the path of the new artifact, which sits next to `input`.
    async fn remux(&self, input: &Path) -> ProcessingResult<PathBuf>;
}

/// Output path for a fast-start remux of `input`: the input path plus `.processing`.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(FASTSTART_SUFFIX);
    PathBuf::from(path)
}

/// [`MediaRemuxer`] backed by the `ffmpeg` binary. Streams are copied, never re-encoded.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: String, timeout: Option<Duration>) -> ProcessingResult<Self> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    fn build_args(input: &Path, output: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = ["-y", "-v", "error", "-i"]
            .iter()
            .map(Into::into)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.extend(
            ["-c", "copy", "-movflags", "faststart", "-f", "mp4"]
                .iter()
                .map(Into::into),
        );
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl MediaRemuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> ProcessingResult<PathBuf> {
        let start = std::time::Instant::now();
        let output_path = faststart_output_path(input);

        let mut command = Command::new(&self.ffmpeg_path);
        command.args(Self::build_args(input, &output_path));

        run_tool("ffmpeg", command, self.timeout).await?;

        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            return Err(ProcessingError::OutputMissing(output_path));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}
