use std::path::PathBuf;
use std::time::Duration;

/// Failures of staging I/O and of the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to run {tool}: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    TimedOut { tool: String, timeout: Duration },

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Malformed probe output: {0}")]
    MalformedOutput(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Expected output was not produced: {0}")]
    OutputMissing(PathBuf),

    #[error("Staging error: {0}")]
    Staging(#[from] std::io::Error),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
