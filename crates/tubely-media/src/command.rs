//! FFmpeg command builder and subprocess runner.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Upper bound on stderr kept in errors and logs.
const MAX_STDERR_BYTES: usize = 4096;

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
        }
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Copy all streams without re-encoding.
    pub fn stream_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set muxer flags.
    pub fn movflags(self, flags: impl Into<String>) -> Self {
        self.output_arg("-movflags").output_arg(flags)
    }

    /// Force the output container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string(), "-v".to_string(), "error".to_string()];

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with a timeout.
///
/// The child is spawned with `kill_on_drop`, so dropping the future returned
/// by [`FfmpegRunner::run`] (client disconnect, request timeout) kills the
/// process.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    /// FFmpeg binary (name resolved via PATH, or an absolute path)
    binary: PathBuf,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRunner {
    /// Create a new runner for the given binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs: None,
        }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command, failing on non-zero exit.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let args = cmd.build_args();
        debug!("Running FFmpeg: {} {}", self.binary.display(), args.join(" "));

        let output = run_captured("ffmpeg", &self.binary, &args, self.timeout_secs)
            .await
            .map_err(|e| match e {
                MediaError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    MediaError::FfmpegNotFound(self.binary.display().to_string())
                }
                other => other,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = stderr_tail(&output.stderr);
            warn!(
                exit_code = ?output.status.code(),
                stderr = %stderr,
                "FFmpeg exited with non-zero status"
            );
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr),
                output.status.code(),
            ))
        }
    }
}

/// Spawn `binary args...`, wait for it under an optional timeout and return
/// its captured output. Exit status is not interpreted here.
pub(crate) async fn run_captured<S: AsRef<OsStr>>(
    tool: &'static str,
    binary: &Path,
    args: &[S],
    timeout_secs: Option<u64>,
) -> MediaResult<Output> {
    let start = Instant::now();

    let child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let result = match timeout_secs {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it
                    warn!(tool, "{} timed out after {} seconds, killing process", tool, secs);
                    record_tool_run(tool, "timeout", start);
                    return Err(MediaError::Timeout(secs));
                }
            }
        }
        None => child.wait_with_output().await,
    };

    let output = result?;
    let status = if output.status.success() { "success" } else { "error" };
    record_tool_run(tool, status, start);

    Ok(output)
}

fn record_tool_run(tool: &'static str, status: &'static str, start: Instant) {
    metrics::counter!("tubely_media_tool_runs_total", "tool" => tool, "status" => status)
        .increment(1);
    metrics::histogram!("tubely_media_tool_duration_seconds", "tool" => tool)
        .record(start.elapsed().as_secs_f64());
}

/// Lossy UTF-8 of the last `MAX_STDERR_BYTES` of a stderr buffer.
pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(MAX_STDERR_BYTES);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg(binary: impl AsRef<OsStr>) -> MediaResult<PathBuf> {
    let binary = binary.as_ref();
    which::which(binary)
        .map_err(|_| MediaError::FfmpegNotFound(binary.to_string_lossy().to_string()))
}

/// Check if FFprobe is available.
pub fn check_ffprobe(binary: impl AsRef<OsStr>) -> MediaResult<PathBuf> {
    let binary = binary.as_ref();
    which::which(binary)
        .map_err(|_| MediaError::FfprobeNotFound(binary.to_string_lossy().to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    /// Write an executable shell script standing in for an external tool.
    #[cfg(unix)]
    pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .stream_copy()
            .movflags("faststart")
            .format("mp4");

        assert_eq!(
            cmd.build_args(),
            vec![
                "-y", "-v", "error", "-i", "in.mp4", "-c", "copy", "-movflags", "faststart",
                "-f", "mp4", "out.mp4"
            ]
        );
    }

    #[test]
    fn test_stderr_tail_truncates() {
        let long = vec![b'x'; MAX_STDERR_BYTES * 2];
        assert_eq!(stderr_tail(&long).len(), MAX_STDERR_BYTES);
        assert_eq!(stderr_tail(b"  boom\n"), "boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_success() {
        let dir = tempfile::tempdir().unwrap();
        let tool = test_support::fake_tool(dir.path(), "ffmpeg", "exit 0");

        let runner = FfmpegRunner::new(tool).with_timeout(10);
        runner.run(&FfmpegCommand::new("a", "b")).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_propagates_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tool = test_support::fake_tool(
            dir.path(),
            "ffmpeg",
            "echo 'moov atom not found' >&2\nexit 3",
        );

        let runner = FfmpegRunner::new(tool).with_timeout(10);
        let err = runner.run(&FfmpegCommand::new("a", "b")).await.unwrap_err();

        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.stderr(), Some("moov atom not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let tool = test_support::fake_tool(dir.path(), "ffmpeg", "sleep 5");

        let runner = FfmpegRunner::new(tool).with_timeout(1);
        let err = runner.run(&FfmpegCommand::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, MediaError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let runner = FfmpegRunner::new("/nonexistent/ffmpeg");
        let err = runner.run(&FfmpegCommand::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, MediaError::FfmpegNotFound(_)));
        assert!(check_ffmpeg("/nonexistent/ffmpeg").is_err());
    }
}
