//! Video upload handler.
//!
//! The request body is streamed to a private temp file, remuxed so the MP4
//! index sits at the front, classified by aspect ratio, and uploaded to the
//! object store under `<aspect>/<random>.mp4`. The record is updated last; if
//! that fails the uploaded object is deleted again.

use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use tracing::{error, info, warn};

use tubely_models::{VideoId, VIDEO_MEDIA_TYPES};
use tubely_storage::video_object_key;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::videos::VideoResponse;
use crate::metrics::{self, stages, timed_stage};
use crate::staging::{stage_field, temp_file_in};
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// Upload, process and attach a video to an existing record.
pub async fn upload_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VideoResponse>> {
    let started = Instant::now();
    let video_id = VideoId::parse(&video_id)?;
    let mut video = state.videos.get_owned(&video_id, &user.user_id).await?;
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    info!(video_id = %video_id, user_id = %user.user_id, "Receiving video upload");

    let staged = timed_stage(
        stages::STAGING,
        stage_field(&mut multipart, VIDEO_FIELD, VIDEO_MEDIA_TYPES, &state.config.tmp_dir),
    )
    .await?;

    let processed = temp_file_in(
        &state.config.tmp_dir,
        "tubely-processed-",
        staged.media_type.extension(),
    )?;
    timed_stage(
        stages::REMUX,
        state.media.remux_faststart(staged.path(), processed.path()),
    )
    .await?;

    let media_type = staged.media_type;
    let size = staged.size;
    drop(staged);

    let aspect = timed_stage(stages::PROBE, state.media.classify(processed.path())).await?;
    let key = video_object_key(aspect, media_type)?;

    timed_stage(
        stages::STORE,
        state
            .storage
            .put_file(&key, processed.path(), media_type.essence()),
    )
    .await?;
    drop(processed);

    video.set_video_locator(state.storage.locator(&key));

    if let Err(e) = timed_stage(stages::PERSIST, state.videos.save(&video)).await {
        warn!(
            video_id = %video_id,
            key = %key,
            "Record update failed, deleting uploaded object"
        );
        if let Err(cleanup) = state.storage.delete_object(&key).await {
            error!(key = %key, error = %cleanup, "Failed to delete orphaned object");
            metrics::record_orphan_cleanup_failure("object");
        }
        return Err(e);
    }

    metrics::record_upload(aspect, size);
    info!(
        video_id = %video_id,
        key = %key,
        aspect = %aspect,
        size,
        duration_ms = started.elapsed().as_millis() as u64,
        "Video upload complete"
    );

    Ok(Json(VideoResponse::signed(&video, state.storage.as_ref()).await?))
}
