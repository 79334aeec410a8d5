//! Video record read handler.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use tubely_models::{VideoId, VideoRecord};
use tubely_storage::{signed_video_url, BlobStore};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Video record as returned to clients.
///
/// `video_url` is a short-lived presigned URL, never the stored locator.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl VideoResponse {
    /// Render a record, signing its video locator if one is set.
    pub async fn signed(video: &VideoRecord, storage: &dyn BlobStore) -> ApiResult<Self> {
        let video_url = signed_video_url(storage, video.video_locator.as_ref()).await?;

        Ok(Self {
            id: video.id.to_string(),
            user_id: video.user_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            created_at: video.created_at,
            updated_at: video.updated_at,
            thumbnail_url: video.thumbnail_url.clone(),
            video_url,
        })
    }
}

/// Get a video owned by the caller.
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<VideoResponse>> {
    let video_id = VideoId::parse(&video_id)?;
    let video = state.videos.get_owned(&video_id, &user.user_id).await?;

    Ok(Json(VideoResponse::signed(&video, state.storage.as_ref()).await?))
}
