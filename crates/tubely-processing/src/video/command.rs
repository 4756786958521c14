use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{ProcessingError, ProcessingResult};

/// Reject tool paths with shell metacharacters or traversal sequences.
pub(crate) fn validate_tool_path(path: &str) -> ProcessingResult<()> {
    if path.is_empty() {
        return Err(ProcessingError::InvalidToolPath("empty path".to_string()));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(format!(
            "contains dangerous characters: {}",
            path
        )));
    }

    if path.contains("..") {
        return Err(ProcessingError::InvalidToolPath(format!(
            "contains directory traversal: {}",
            path
        )));
    }

    Ok(())
}

/// Run a tool to completion, capturing stdout and stderr.
///
/// A spawn failure maps to `ToolUnavailable`, a nonzero exit to `ToolFailed`. With a
/// timeout the child is killed once it elapses.
pub(crate) async fn run_tool(
    tool: &str,
    mut command: Command,
    timeout: Option<Duration>,
) -> ProcessingResult<Output> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, command.output())
            .await
            .map_err(|_| ProcessingError::TimedOut {
                tool: tool.to_string(),
                timeout: limit,
            })?,
        None => command.output().await,
    }
    .map_err(|source| ProcessingError::ToolUnavailable {
        tool: tool.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tool_path() {
        assert!(validate_tool_path("ffprobe").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_tool_path("").is_err());
        assert!(validate_tool_path("ffprobe; rm -rf /").is_err());
        assert!(validate_tool_path("../bin/ffprobe").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let result = run_tool(
            "ffprobe",
            Command::new("/nonexistent/tubely/ffprobe"),
            None,
        )
        .await;
        assert!(matches!(result, Err(ProcessingError::ToolUnavailable { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo 'moov atom not found' >&2; exit 3"]);
        match run_tool("ffmpeg", command, None).await {
            Err(ProcessingError::ToolFailed { tool, stderr, .. }) => {
                assert_eq!(tool, "ffmpeg");
                assert_eq!(stderr, "moov atom not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_hung_tool() {
        let mut command = Command::new("sh");
        command.args(["-c", "sleep 30"]);
        let started = std::time::Instant::now();
        let result = run_tool("ffprobe", command, Some(Duration::from_millis(200))).await;
        assert!(matches!(result, Err(ProcessingError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
