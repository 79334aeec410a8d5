//! S3 object storage for processed uploads.
//!
//! This crate provides:
//! - Streaming file upload to S3 (or an S3-compatible endpoint)
//! - Presigned GET URLs
//! - Object deletion and connectivity checks
//! - Unpredictable object key generation

pub mod client;
pub mod delivery;
pub mod error;
pub mod keys;
pub mod store;

pub use client::{S3Client, S3Config};
pub use delivery::{signed_video_url, SIGNED_URL_EXPIRY, SIGNED_URL_EXPIRY_SECS};
pub use error::{StorageError, StorageResult};
pub use keys::{random_file_name, video_object_key, RANDOM_NAME_BYTES};
pub use store::BlobStore;
