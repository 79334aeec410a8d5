//! In-memory collaborators and request helpers for router tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use tubely_api::{create_router, ApiConfig, AppState, JwtVerifier, VideoStore};
use tubely_firestore::{FirestoreError, FirestoreResult};
use tubely_media::{MediaError, MediaProcessor, MediaResult, VideoDimensions};
use tubely_models::{StorageLocator, UserId, VideoId, VideoRecord};
use tubely_storage::{BlobStore, StorageError, StorageResult};

pub const JWT_SECRET: &str = "router-test-secret";
pub const BUCKET: &str = "tubely-test";
pub const BOUNDARY: &str = "tubely-test-boundary";

/// Prefix the fake remux writes in front of the input bytes.
pub const REMUX_MARKER: &[u8] = b"faststart:";

#[derive(Default)]
pub struct FakeVideoStore {
    pub videos: Mutex<HashMap<VideoId, VideoRecord>>,
    pub updates: AtomicUsize,
    pub fail_updates: AtomicBool,
}

impl FakeVideoStore {
    pub fn insert(&self, video: VideoRecord) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: &VideoId) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl VideoStore for FakeVideoStore {
    async fn get_video(&self, video_id: &VideoId) -> FirestoreResult<Option<VideoRecord>> {
        Ok(self.get(video_id))
    }

    async fn update_video(&self, video: &VideoRecord) -> FirestoreResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(FirestoreError::ServerError(500, "update rejected".into()));
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.insert(video.clone());
        Ok(())
    }

    async fn ping(&self) -> FirestoreResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct FakeBlobStore {
    pub objects: Mutex<Vec<StoredObject>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_puts: AtomicBool,
}

impl FakeBlobStore {
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::upload_failed("PutObject: service unavailable"));
        }
        let bytes = tokio::fs::read(path).await?;
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(())
    }

    async fn presign_get(
        &self,
        locator: &StorageLocator,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.s3.test/{}?X-Amz-Expires={}",
            locator.bucket,
            locator.key,
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}

pub struct FakeMedia {
    pub dimensions: Mutex<VideoDimensions>,
    pub fail_remux: AtomicBool,
    pub fail_dimensions: AtomicBool,
    pub remux_calls: AtomicUsize,
}

impl FakeMedia {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Mutex::new(VideoDimensions { width, height }),
            fail_remux: AtomicBool::new(false),
            fail_dimensions: AtomicBool::new(false),
            remux_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock().unwrap() = VideoDimensions { width, height };
    }
}

#[async_trait]
impl MediaProcessor for FakeMedia {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()> {
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remux.load(Ordering::SeqCst) {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with status 1",
                Some("moov atom not found".to_string()),
                Some(1),
            ));
        }
        let mut data = REMUX_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        tokio::fs::write(output, data).await?;
        Ok(())
    }

    async fn probe_dimensions(&self, _path: &Path) -> MediaResult<VideoDimensions> {
        if self.fail_dimensions.load(Ordering::SeqCst) {
            return Err(MediaError::invalid_video("No video stream found"));
        }
        Ok(*self.dimensions.lock().unwrap())
    }

    fn check_tools(&self) -> MediaResult<()> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<FakeVideoStore>,
    pub blobs: Arc<FakeBlobStore>,
    pub media: Arc<FakeMedia>,
    pub jwt: JwtVerifier,
    pub tmp_dir: PathBuf,
    pub assets_root: PathBuf,
    pub asset_staging_dir: PathBuf,
    _root: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(customize: impl FnOnce(&mut ApiConfig)) -> Self {
        let root = tempfile::tempdir().unwrap();
        let tmp_dir = root.path().join("tmp");
        let assets_root = root.path().join("assets");

        let mut config = ApiConfig {
            jwt_secret: JWT_SECRET.to_string(),
            tmp_dir: tmp_dir.clone(),
            assets_root: assets_root.clone(),
            public_base_url: "http://localhost:8091".to_string(),
            ..ApiConfig::default()
        };
        customize(&mut config);
        let asset_staging_dir = config.asset_staging_dir();

        let store = Arc::new(FakeVideoStore::default());
        let blobs = Arc::new(FakeBlobStore::default());
        let media = Arc::new(FakeMedia::new(1920, 1080));

        let state =
            AppState::from_parts(config, blobs.clone(), media.clone(), store.clone()).unwrap();

        Self {
            router: create_router(state, None),
            store,
            blobs,
            media,
            jwt: JwtVerifier::new(JWT_SECRET).unwrap(),
            tmp_dir,
            assets_root,
            asset_staging_dir,
            _root: root,
        }
    }

    /// Insert a video owned by a fresh user and return both.
    pub fn seed_video(&self) -> (UserId, VideoRecord) {
        let owner = UserId(Uuid::new_v4());
        let video = VideoRecord::new(owner, "Boots demo", "A short clip");
        self.store.insert(video.clone());
        (owner, video)
    }

    pub fn token_for(&self, user: &UserId) -> String {
        self.jwt.issue(user, Duration::from_secs(3600)).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub fn tmp_is_empty(&self) -> bool {
        dir_is_empty(&self.tmp_dir)
    }

    pub fn asset_staging_is_empty(&self) -> bool {
        dir_is_empty(&self.asset_staging_dir)
    }
}

pub fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

/// Build a single-part multipart/form-data body.
pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart upload, optionally authenticated.
pub fn upload_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
