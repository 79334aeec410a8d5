//! Accepted upload media types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};

/// Media types the backend knows how to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MediaType {
    #[serde(rename = "video/mp4")]
    VideoMp4,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "image/png")]
    ImagePng,
}

/// Allow-list for the video upload endpoint.
pub const VIDEO_MEDIA_TYPES: &[MediaType] = &[MediaType::VideoMp4];

/// Allow-list for the thumbnail upload endpoint.
pub const THUMBNAIL_MEDIA_TYPES: &[MediaType] = &[MediaType::ImageJpeg, MediaType::ImagePng];

impl MediaType {
    /// `type/subtype` without parameters.
    pub fn essence(&self) -> &'static str {
        match self {
            MediaType::VideoMp4 => "video/mp4",
            MediaType::ImageJpeg => "image/jpeg",
            MediaType::ImagePng => "image/png",
        }
    }

    /// File extension for stored objects (the subtype).
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::VideoMp4 => "mp4",
            MediaType::ImageJpeg => "jpeg",
            MediaType::ImagePng => "png",
        }
    }

    /// Parse a declared `Content-Type` and check it against an allow-list.
    ///
    /// Parameters (`; codecs=...`) are ignored and comparison is on the
    /// lowercased essence only.
    pub fn parse_allowed(content_type: Option<&str>, allowed: &[MediaType]) -> ModelResult<Self> {
        let raw = content_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ModelError::MissingContentType)?;

        let parsed: mime::Mime = raw
            .parse()
            .map_err(|_| ModelError::InvalidContentType(raw.to_string()))?;
        let essence = parsed.essence_str().to_ascii_lowercase();

        allowed
            .iter()
            .copied()
            .find(|m| m.essence() == essence)
            .ok_or(ModelError::UnsupportedMediaType(essence))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.essence())
    }
}
