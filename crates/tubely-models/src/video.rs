//! Video record models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::locator::StorageLocator;

/// Unique identifier for a video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a path segment. Only canonical UUIDs are accepted.
    pub fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VideoId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Unique identifier for a user (the `sub` of an access token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Video record as persisted in the metadata store.
///
/// `video_locator` holds a reference to the stored object, never a URL. It is
/// turned into a short-lived signed URL whenever the record is returned to a
/// client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoRecord {
    /// Unique video ID
    pub id: VideoId,

    /// Owner
    pub user_id: UserId,

    /// Video title
    pub title: String,

    /// Video description
    #[serde(default)]
    pub description: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Public thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Location of the processed video in object storage
    #[serde(default, rename = "video_url", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub video_locator: Option<StorageLocator>,
}

impl VideoRecord {
    /// Create a new record with no media attached.
    pub fn new(user_id: UserId, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            user_id,
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_locator: None,
        }
    }

    /// Check whether `user_id` owns this record.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Attach a processed video.
    pub fn set_video_locator(&mut self, locator: StorageLocator) {
        self.video_locator = Some(locator);
        self.updated_at = Utc::now();
    }

    /// Attach a thumbnail URL.
    pub fn set_thumbnail_url(&mut self, url: impl Into<String>) {
        self.thumbnail_url = Some(url.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_parse() {
        let id = VideoId::new();
        assert_eq!(VideoId::parse(&id.to_string()).unwrap(), id);
        assert!(VideoId::parse("not-a-uuid").is_err());
        assert!(VideoId::parse("").is_err());
    }

    #[test]
    fn test_ownership() {
        let owner = UserId(Uuid::new_v4());
        let other = UserId(Uuid::new_v4());
        let video = VideoRecord::new(owner, "Boots", "");

        assert!(video.is_owned_by(&owner));
        assert!(!video.is_owned_by(&other));
    }

    #[test]
    fn test_locator_serialized_as_delimited_string() {
        let mut video = VideoRecord::new(UserId(Uuid::new_v4()), "Boots", "desc");
        video.set_video_locator(StorageLocator::new("tubely-bucket", "landscape/abc.mp4"));

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["video_url"], "tubely-bucket,landscape/abc.mp4");

        let back: VideoRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, video);
    }

    #[test]
    fn test_record_without_locator_omits_field() {
        let video = VideoRecord::new(UserId(Uuid::new_v4()), "Boots", "");
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("video_url").is_none());
        assert!(json.get("thumbnail_url").is_none());
    }
}
