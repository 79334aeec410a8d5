//! Typed repository for video records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use tubely_models::{StorageLocator, UserId, VideoId, VideoRecord};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, ToFirestoreValue, Value};

/// Top-level collection holding video documents.
pub const VIDEOS_COLLECTION: &str = "videos";

/// Fields written by [`VideoRepository::update`].
const VIDEO_UPDATE_MASK: &[&str] = &[
    "user_id",
    "title",
    "description",
    "created_at",
    "updated_at",
    "thumbnail_url",
    "video_url",
];

/// Repository for video documents.
#[derive(Clone)]
pub struct VideoRepository {
    client: FirestoreClient,
}

impl VideoRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Get a video by ID.
    pub async fn get(&self, video_id: &VideoId) -> FirestoreResult<Option<VideoRecord>> {
        let doc = self
            .client
            .get_document(VIDEOS_COLLECTION, &video_id.to_string())
            .await?;

        doc.map(|d| document_to_video_record(&d, video_id)).transpose()
    }

    /// Overwrite an existing video document with `video`.
    ///
    /// Unset optional fields are removed from the stored document.
    pub async fn update(&self, video: &VideoRecord) -> FirestoreResult<()> {
        let fields = video_record_to_fields(video);
        self.client
            .update_document(
                VIDEOS_COLLECTION,
                &video.id.to_string(),
                fields,
                VIDEO_UPDATE_MASK,
            )
            .await?;
        info!(video_id = %video.id, "Updated video record");
        Ok(())
    }

    /// Reachability check: reads a sentinel document.
    pub async fn ping(&self) -> FirestoreResult<()> {
        match self.client.get_document("_health", "_check").await {
            Ok(_) => Ok(()),
            Err(FirestoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn video_record_to_fields(video: &VideoRecord) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("user_id".to_string(), video.user_id.to_string().to_firestore_value());
    fields.insert("title".to_string(), video.title.to_firestore_value());
    fields.insert("description".to_string(), video.description.to_firestore_value());
    fields.insert("created_at".to_string(), video.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), video.updated_at.to_firestore_value());

    if let Some(ref url) = video.thumbnail_url {
        fields.insert("thumbnail_url".to_string(), url.to_firestore_value());
    }
    if let Some(ref locator) = video.video_locator {
        fields.insert("video_url".to_string(), locator.encode().to_firestore_value());
    }

    fields
}

fn document_to_video_record(doc: &Document, video_id: &VideoId) -> FirestoreResult<VideoRecord> {
    if doc.fields.is_none() {
        return Err(FirestoreError::invalid_response("Document has no fields"));
    }

    let user_id = doc
        .get::<String>("user_id")
        .ok_or_else(|| {
            FirestoreError::invalid_response(format!("Video {} has no user_id", video_id))
        })
        .and_then(|s| {
            UserId::parse(&s).map_err(|e| FirestoreError::invalid_response(e.to_string()))
        })?;

    // Unparsable values read as absent
    let video_locator = match doc.get::<String>("video_url") {
        Some(raw) => match raw.parse::<StorageLocator>() {
            Ok(locator) => Some(locator),
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Ignoring unparsable video_url");
                None
            }
        },
        None => None,
    };

    let created_at = doc.get::<DateTime<Utc>>("created_at").unwrap_or_else(Utc::now);
    let updated_at = doc.get::<DateTime<Utc>>("updated_at").unwrap_or(created_at);

    debug!(video_id = %video_id, "Loaded video record");

    Ok(VideoRecord {
        id: *video_id,
        user_id,
        title: doc.get("title").unwrap_or_default(),
        description: doc.get("description").unwrap_or_default(),
        created_at,
        updated_at,
        thumbnail_url: doc.get("thumbnail_url"),
        video_locator,
    })
}
