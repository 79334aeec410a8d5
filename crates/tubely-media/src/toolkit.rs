//! `MediaProcessor` seam used by the upload pipeline.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tubely_models::AspectBucket;

use crate::aspect::classify_aspect;
use crate::command::{check_ffmpeg, check_ffprobe, FfmpegRunner};
use crate::error::MediaResult;
use crate::probe::{probe_dimensions, VideoDimensions};
use crate::remux::remux_faststart;

/// Default per-invocation timeout for ffmpeg/ffprobe.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

/// Locations and limits of the external media tools.
#[derive(Debug, Clone)]
pub struct MediaToolConfig {
    /// ffmpeg binary (`FFMPEG_PATH`)
    pub ffmpeg_path: PathBuf,
    /// ffprobe binary (`FFPROBE_PATH`)
    pub ffprobe_path: PathBuf,
    /// Per-invocation timeout (`FFMPEG_TIMEOUT_SECS`)
    pub timeout_secs: u64,
}

impl Default for MediaToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
        }
    }
}

impl MediaToolConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg_path: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: std::env::var("FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            timeout_secs: std::env::var("FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Media operations the upload pipeline depends on.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Stream-copy `input` into `output` with the index moved to the front.
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()>;

    /// Dimensions of the first video stream.
    async fn probe_dimensions(&self, path: &Path) -> MediaResult<VideoDimensions>;

    /// Probe and bucket a file.
    async fn classify(&self, path: &Path) -> MediaResult<AspectBucket> {
        let dims = self.probe_dimensions(path).await?;
        classify_aspect(&dims)
    }

    /// Verify the external tools can be resolved.
    fn check_tools(&self) -> MediaResult<()>;
}

/// [`MediaProcessor`] backed by the ffmpeg/ffprobe CLIs.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    config: MediaToolConfig,
    runner: FfmpegRunner,
}

impl FfmpegToolkit {
    pub fn new(config: MediaToolConfig) -> Self {
        let runner =
            FfmpegRunner::new(config.ffmpeg_path.clone()).with_timeout(config.timeout_secs);
        Self { config, runner }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegToolkit {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()> {
        remux_faststart(&self.runner, input, output).await
    }

    async fn probe_dimensions(&self, path: &Path) -> MediaResult<VideoDimensions> {
        probe_dimensions(&self.config.ffprobe_path, path, Some(self.config.timeout_secs)).await
    }

    async fn classify(&self, path: &Path) -> MediaResult<AspectBucket> {
        let start = Instant::now();
        let dims = self.probe_dimensions(path).await?;
        let bucket = classify_aspect(&dims)?;
        info!(
            width = dims.width,
            height = dims.height,
            aspect = %bucket,
            duration_ms = start.elapsed().as_millis() as u64,
            "Classified video aspect ratio"
        );
        Ok(bucket)
    }

    fn check_tools(&self) -> MediaResult<()> {
        check_ffmpeg(&self.config.ffmpeg_path)?;
        check_ffprobe(&self.config.ffprobe_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MediaToolConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.timeout_secs, DEFAULT_TOOL_TIMEOUT_SECS);
    }

    #[test]
    fn test_check_tools_missing() {
        let toolkit = FfmpegToolkit::new(MediaToolConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe_path: PathBuf::from("/nonexistent/ffprobe"),
            timeout_secs: 1,
        });
        assert!(toolkit.check_tools().is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_classify_portrait() {
        use crate::command::test_support::fake_tool;

        let dir = tempfile::tempdir().unwrap();
        let ffprobe = fake_tool(
            dir.path(),
            "ffprobe",
            r#"echo '{"streams":[{"codec_type":"video","width":720,"height":1280}]}'"#,
        );
        let ffmpeg = fake_tool(dir.path(), "ffmpeg", "exit 0");
        let input = dir.path().join("v.mp4");
        std::fs::write(&input, b"x").unwrap();

        let toolkit = FfmpegToolkit::new(MediaToolConfig {
            ffmpeg_path: ffmpeg,
            ffprobe_path: ffprobe,
            timeout_secs: 10,
        });
        assert_eq!(toolkit.classify(&input).await.unwrap(), AspectBucket::Portrait);
        toolkit.check_tools().unwrap();
    }
}
