//! Shared data models for the Tubely backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video records and their identifiers
//! - Storage locators (bucket + object key)
//! - Aspect-ratio buckets
//! - Accepted upload media types

pub mod aspect;
pub mod error;
pub mod locator;
pub mod media_type;
pub mod video;

// Re-export common types
pub use aspect::AspectBucket;
pub use error::{ModelError, ModelResult};
pub use locator::StorageLocator;
pub use media_type::{MediaType, THUMBNAIL_MEDIA_TYPES, VIDEO_MEDIA_TYPES};
pub use video::{UserId, VideoId, VideoRecord};
