//! Prometheus metrics for the API server.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

use tubely_models::AspectBucket;

// =============================================================================
// Recorder & Names
// =============================================================================

/// Install the Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "tubely_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "tubely_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "tubely_http_requests_in_flight";

    // Upload pipeline metrics
    pub const UPLOAD_STAGE_DURATION_SECONDS: &str = "tubely_upload_stage_duration_seconds";
    pub const UPLOAD_STAGE_FAILURES_TOTAL: &str = "tubely_upload_stage_failures_total";
    pub const UPLOADS_TOTAL: &str = "tubely_uploads_total";
    pub const UPLOAD_BYTES: &str = "tubely_upload_bytes";
    pub const THUMBNAILS_TOTAL: &str = "tubely_thumbnails_total";
    pub const ORPHAN_CLEANUP_FAILURES_TOTAL: &str = "tubely_orphan_cleanup_failures_total";
}

/// Upload pipeline stages, used as the `stage` label.
pub mod stages {
    pub const STAGING: &str = "staging";
    pub const REMUX: &str = "remux";
    pub const PROBE: &str = "probe";
    pub const STORE: &str = "store";
    pub const PERSIST: &str = "persist";
}

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});
static ASSET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/assets/[A-Za-z0-9_.-]+").unwrap());

// =============================================================================
// Recording
// =============================================================================

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Run one upload stage, recording its duration and any failure.
pub async fn timed_stage<T, E, F>(stage: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = fut.await;
    histogram!(names::UPLOAD_STAGE_DURATION_SECONDS, "stage" => stage)
        .record(start.elapsed().as_secs_f64());
    if result.is_err() {
        counter!(names::UPLOAD_STAGE_FAILURES_TOTAL, "stage" => stage).increment(1);
    }
    result
}

/// Record a completed video upload.
pub fn record_upload(aspect: AspectBucket, bytes: u64) {
    counter!(names::UPLOADS_TOTAL, "aspect" => aspect.as_str()).increment(1);
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Record a stored thumbnail.
pub fn record_thumbnail(media_type: &'static str) {
    counter!(names::THUMBNAILS_TOTAL, "media_type" => media_type).increment(1);
}

/// Record a stored object or asset that could not be removed after a failed update.
pub fn record_orphan_cleanup_failure(kind: &'static str) {
    counter!(names::ORPHAN_CLEANUP_FAILURES_TOTAL, "kind" => kind).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, ":id");
    let path = ASSET_NAME.replace_all(&path, "/assets/:file");
    path.into_owned()
}

// =============================================================================
// Middleware
// =============================================================================

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    // Also decrements when the client disconnects mid-request
    let _in_flight = scopeguard::guard((), |_| {
        gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);
    });

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
