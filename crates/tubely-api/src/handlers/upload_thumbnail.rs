//! Thumbnail upload handler.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use tracing::{error, info, warn};

use tubely_models::{VideoId, THUMBNAIL_MEDIA_TYPES};
use tubely_storage::random_file_name;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::videos::VideoResponse;
use crate::metrics;
use crate::staging::stage_field;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Store a thumbnail image under the assets root and attach its public URL.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VideoResponse>> {
    let video_id = VideoId::parse(&video_id)?;
    let mut video = state.videos.get_owned(&video_id, &user.user_id).await?;
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let staging_dir = state.config.asset_staging_dir();
    let staged = stage_field(&mut multipart, THUMBNAIL_FIELD, THUMBNAIL_MEDIA_TYPES, &staging_dir)
        .await?;

    let file_name = random_file_name(staged.media_type.extension())?;
    let asset_path = state.config.assets_root.join(&file_name);
    let media_type = staged.media_type;

    staged
        .file
        .persist_noclobber(&asset_path)
        .map_err(|e| ApiError::Io(e.error))?;

    video.set_thumbnail_url(state.config.asset_url(&file_name));

    if let Err(e) = state.videos.save(&video).await {
        warn!(
            video_id = %video_id,
            asset = %file_name,
            "Record update failed, removing thumbnail"
        );
        if let Err(cleanup) = tokio::fs::remove_file(&asset_path).await {
            error!(asset = %file_name, error = %cleanup, "Failed to remove orphaned thumbnail");
            metrics::record_orphan_cleanup_failure("asset");
        }
        return Err(e);
    }

    metrics::record_thumbnail(media_type.essence());
    info!(video_id = %video_id, asset = %file_name, "Thumbnail stored");

    Ok(Json(VideoResponse::signed(&video, state.storage.as_ref()).await?))
}
