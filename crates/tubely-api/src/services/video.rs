//! Video record access with ownership enforcement.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use tubely_firestore::{FirestoreResult, VideoRepository};
use tubely_models::{UserId, VideoId, VideoRecord};

use crate::error::{ApiError, ApiResult};

/// Persistence operations the API needs for video records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Fetch a record, `None` when it does not exist.
    async fn get_video(&self, video_id: &VideoId) -> FirestoreResult<Option<VideoRecord>>;

    /// Persist every field of an existing record.
    async fn update_video(&self, video: &VideoRecord) -> FirestoreResult<()>;

    /// Reachability check for readiness probes.
    async fn ping(&self) -> FirestoreResult<()>;
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn get_video(&self, video_id: &VideoId) -> FirestoreResult<Option<VideoRecord>> {
        self.get(video_id).await
    }

    async fn update_video(&self, video: &VideoRecord) -> FirestoreResult<()> {
        self.update(video).await
    }

    async fn ping(&self) -> FirestoreResult<()> {
        VideoRepository::ping(self).await
    }
}

/// Service for reading and saving video records on behalf of a user.
#[derive(Clone)]
pub struct VideoService {
    store: Arc<dyn VideoStore>,
}

impl VideoService {
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self { store }
    }

    /// Load a video that `user_id` owns.
    ///
    /// Unknown IDs are `NotFound`; records owned by someone else are `Forbidden`.
    pub async fn get_owned(&self, video_id: &VideoId, user_id: &UserId) -> ApiResult<VideoRecord> {
        let video = self
            .store
            .get_video(video_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Video not found"))?;

        if !video.is_owned_by(user_id) {
            warn!(
                video_id = %video_id,
                user_id = %user_id,
                "Rejected access to another user's video"
            );
            return Err(ApiError::forbidden("Not authorized to modify this video"));
        }

        debug!(video_id = %video_id, "Loaded owned video");
        Ok(video)
    }

    /// Persist an updated record.
    pub async fn save(&self, video: &VideoRecord) -> ApiResult<()> {
        self.store.update_video(video).await?;
        Ok(())
    }

    pub async fn ping(&self) -> ApiResult<()> {
        self.store.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn owner() -> UserId {
        UserId(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_get_owned_returns_record_for_owner() {
        let user = owner();
        let record = VideoRecord::new(user, "title", "desc");
        let id = record.id;

        let mut store = MockVideoStore::new();
        let returned = record.clone();
        store
            .expect_get_video()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = VideoService::new(Arc::new(store));
        let video = service.get_owned(&id, &user).await.unwrap();
        assert_eq!(video.id, id);
    }

    #[tokio::test]
    async fn test_get_owned_forbidden_for_other_user() {
        let record = VideoRecord::new(owner(), "title", "desc");
        let id = record.id;

        let mut store = MockVideoStore::new();
        store
            .expect_get_video()
            .returning(move |_| Ok(Some(record.clone())));
        store.expect_update_video().never();

        let service = VideoService::new(Arc::new(store));
        let err = service.get_owned(&id, &owner()).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_get_owned_not_found() {
        let mut store = MockVideoStore::new();
        store.expect_get_video().returning(|_| Ok(None));

        let service = VideoService::new(Arc::new(store));
        let err = service.get_owned(&VideoId::new(), &owner()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_surfaces_store_failure_as_server_error() {
        let mut store = MockVideoStore::new();
        store.expect_update_video().times(1).returning(|_| {
            Err(tubely_firestore::FirestoreError::ServerError(
                503,
                "unavailable".into(),
            ))
        });

        let service = VideoService::new(Arc::new(store));
        let err = service
            .save(&VideoRecord::new(owner(), "t", "d"))
            .await
            .unwrap_err();
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
