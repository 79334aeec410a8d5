//! Firestore REST API client.
//!
//! This crate provides:
//! - A typed repository for video records
//! - Service account authentication via gcp_auth
//! - Masked updates and retry logic

pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod retry;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use repos::{VideoRepository, VIDEOS_COLLECTION};
pub use retry::RetryConfig;
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
