//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Largest accepted video upload body (1 GiB).
pub const MAX_UPLOAD_SIZE: usize = 1 << 30;

/// Largest accepted thumbnail upload body (10 MiB).
pub const MAX_THUMBNAIL_SIZE: usize = 10 << 20;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Timeout for ordinary requests
    pub request_timeout: Duration,
    /// Timeout for the video upload route (covers remux and upload)
    pub upload_timeout: Duration,
    /// Max video upload body size
    pub max_upload_size: usize,
    /// Max thumbnail upload body size
    pub max_thumbnail_size: usize,
    /// HS256 secret for access tokens
    pub jwt_secret: String,
    /// Directory thumbnails are written to and served from
    pub assets_root: PathBuf,
    /// Directory for staged and processed upload files
    pub tmp_dir: PathBuf,
    /// Base URL used to build public asset links
    pub public_base_url: String,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8091,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(30 * 60),
            max_upload_size: MAX_UPLOAD_SIZE,
            max_thumbnail_size: MAX_THUMBNAIL_SIZE,
            jwt_secret: String::new(),
            assets_root: PathBuf::from("./assets"),
            tmp_dir: std::env::temp_dir(),
            public_base_url: "http://localhost:8091".to_string(),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_parse("API_PORT").unwrap_or(defaults.port);

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port,
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            request_timeout: env_parse("REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            upload_timeout: env_parse("UPLOAD_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.upload_timeout),
            max_upload_size: env_parse("MAX_UPLOAD_SIZE").unwrap_or(defaults.max_upload_size),
            max_thumbnail_size: env_parse("MAX_THUMBNAIL_SIZE")
                .unwrap_or(defaults.max_thumbnail_size),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_default(),
            assets_root: std::env::var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_root),
            tmp_dir: std::env::var("TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tmp_dir),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Where thumbnails are staged before the move into the assets root.
    /// A hidden sibling of the assets root, outside what `/assets` serves.
    pub fn asset_staging_dir(&self) -> PathBuf {
        let name = self
            .assets_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "assets".to_string());
        self.assets_root.with_file_name(format!(".{}-staging", name))
    }

    /// Public URL of a file under the assets root.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!(
            "{}/assets/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        )
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
