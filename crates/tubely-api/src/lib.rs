//! Axum HTTP API server.
//!
//! This crate provides:
//! - Authenticated video and thumbnail upload endpoints
//! - HS256 bearer token verification
//! - Security headers, CORS and request timeouts
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod staging;
pub mod state;

pub use auth::{AuthUser, JwtVerifier};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{VideoService, VideoStore};
pub use state::AppState;
