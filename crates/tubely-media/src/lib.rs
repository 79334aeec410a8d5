//! FFmpeg CLI wrapper for upload processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A subprocess runner with timeout and kill-on-drop
//! - Faststart remuxing (stream copy, no re-encode)
//! - FFprobe stream geometry and aspect-ratio classification

pub mod aspect;
pub mod command;
pub mod error;
pub mod probe;
pub mod remux;
pub mod toolkit;

pub use aspect::classify_aspect;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{parse_dimensions, probe_dimensions, VideoDimensions};
pub use remux::{faststart_command, remux_faststart};
pub use toolkit::{FfmpegToolkit, MediaProcessor, MediaToolConfig, DEFAULT_TOOL_TIMEOUT_SECS};
