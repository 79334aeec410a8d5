//! Faststart remux: relocate the `moov` atom ahead of media data.

use std::path::Path;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the stream-copy faststart command for `input` -> `output`.
pub fn faststart_command(input: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .stream_copy()
        .movflags("faststart")
        .format("mp4")
}

/// Rewrite `input` into `output` for progressive playback, without re-encoding.
///
/// `output` may already exist (e.g. a reserved temp file); it is overwritten.
pub async fn remux_faststart(
    runner: &FfmpegRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !tokio::fs::try_exists(input).await? {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    debug!(input = %input.display(), output = %output.display(), "Starting faststart remux");
    runner.run(&faststart_command(input, output)).await?;

    let size = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(MediaError::ffmpeg_failed(
            "FFmpeg produced no output",
            None,
            Some(0),
        ));
    }

    info!(output = %output.display(), size, "Faststart remux complete");
    Ok(())
}
