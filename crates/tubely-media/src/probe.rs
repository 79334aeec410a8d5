//! FFprobe stream geometry.

use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::debug;

use crate::command::{run_captured, stderr_tail};
use crate::error::{MediaError, MediaResult};

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    /// Width / height. Callers must ensure `height > 0`.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Arguments passed to ffprobe before the input path.
const PROBE_ARGS: [&str; 5] = ["-v", "error", "-print_format", "json", "-show_streams"];

/// Probe the first video stream of `path` for its dimensions.
pub async fn probe_dimensions(
    ffprobe: &Path,
    path: impl AsRef<Path>,
    timeout_secs: Option<u64>,
) -> MediaResult<VideoDimensions> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let mut args: Vec<&OsStr> = PROBE_ARGS.iter().copied().map(OsStr::new).collect();
    args.push(path.as_os_str());

    let output = run_captured("ffprobe", ffprobe, &args, timeout_secs)
        .await
        .map_err(|e| match e {
            MediaError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                MediaError::FfprobeNotFound(ffprobe.display().to_string())
            }
            other => other,
        })?;

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            "FFprobe exited with non-zero status",
            Some(stderr_tail(&output.stderr)),
            output.status.code(),
        ));
    }

    let dims = parse_dimensions(&output.stdout)?;
    debug!(path = %path.display(), width = dims.width, height = dims.height, "Probed video");
    Ok(dims)
}

/// Extract the dimensions of the first `video` stream from ffprobe JSON.
pub fn parse_dimensions(json: &[u8]) -> MediaResult<VideoDimensions> {
    let probe: FfprobeOutput = serde_json::from_slice(json)?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MediaError::invalid_video("No video stream found"))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if height > 0 => Ok(VideoDimensions { width, height }),
        (Some(_), Some(_)) => Err(MediaError::invalid_video("Video stream has zero height")),
        _ => Err(MediaError::invalid_video("Video stream has no dimensions")),
    }
}
