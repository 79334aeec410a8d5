//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

use crate::handlers::{get_video, health, ready, upload_thumbnail, upload_video};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let config = &state.config;

    // Upload: large body, long timeout (remux + object store upload)
    let upload_routes = Router::new()
        .route("/videos/:video_id/upload", post(upload_video))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(TimeoutLayer::new(config.upload_timeout));

    let thumbnail_routes = Router::new()
        .route("/videos/:video_id/thumbnail", post(upload_thumbnail))
        .layer(DefaultBodyLimit::max(config.max_thumbnail_size))
        .layer(TimeoutLayer::new(config.request_timeout));

    let video_routes = Router::new()
        .route("/videos/:video_id", get(get_video))
        .layer(TimeoutLayer::new(config.request_timeout));

    let api_routes = Router::new()
        .merge(upload_routes)
        .merge(thumbnail_routes)
        .merge(video_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let cors = cors_layer(&config.cors_origins);
    let assets = ServeDir::new(&config.assets_root);

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/assets", assets)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
        .with_state(state)
}
