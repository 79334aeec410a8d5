//! Application state.

use std::sync::Arc;

use tracing::info;

use tubely_firestore::{FirestoreClient, VideoRepository};
use tubely_media::{FfmpegToolkit, MediaProcessor, MediaToolConfig};
use tubely_storage::{BlobStore, S3Client};

use crate::auth::JwtVerifier;
use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::services::{VideoService, VideoStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<dyn BlobStore>,
    pub media: Arc<dyn MediaProcessor>,
    pub videos: VideoService,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    /// Create application state from the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let storage = S3Client::from_env().await?;
        let firestore = FirestoreClient::from_env().await?;
        let media = FfmpegToolkit::new(MediaToolConfig::from_env());

        if let Err(e) = media.check_tools() {
            // Not fatal: /ready reports it
            tracing::warn!("Media tools unavailable at startup: {}", e);
        }

        let state = Self::from_parts(
            config,
            Arc::new(storage),
            Arc::new(media),
            Arc::new(VideoRepository::new(firestore)),
        )?;

        info!(
            bucket = state.storage.bucket(),
            assets_root = %state.config.assets_root.display(),
            "Application state initialized"
        );
        Ok(state)
    }

    /// Assemble state from already-built dependencies.
    ///
    /// Creates the assets and temp directories if they are missing.
    pub fn from_parts(
        config: ApiConfig,
        storage: Arc<dyn BlobStore>,
        media: Arc<dyn MediaProcessor>,
        store: Arc<dyn VideoStore>,
    ) -> ApiResult<Self> {
        std::fs::create_dir_all(&config.assets_root)?;
        std::fs::create_dir_all(config.asset_staging_dir())?;
        std::fs::create_dir_all(&config.tmp_dir)?;

        let jwt = JwtVerifier::new(&config.jwt_secret)?;

        Ok(Self {
            config,
            storage,
            media,
            videos: VideoService::new(store),
            jwt: Arc::new(jwt),
        })
    }
}
