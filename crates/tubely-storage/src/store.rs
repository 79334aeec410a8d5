//! Object store seam.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tubely_models::StorageLocator;

use crate::error::StorageResult;

/// Operations the backend needs from an object store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket new objects are written to.
    fn bucket(&self) -> &str;

    /// Stream a local file to `key` in [`BlobStore::bucket`].
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()>;

    /// Presigned GET URL for a stored object.
    async fn presign_get(&self, locator: &StorageLocator, expires_in: Duration)
        -> StorageResult<String>;

    /// Delete `key` from [`BlobStore::bucket`].
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Cheap reachability check for readiness probes.
    async fn check_connectivity(&self) -> StorageResult<()>;

    /// Locator for `key` in this store's bucket.
    fn locator(&self, key: &str) -> StorageLocator {
        StorageLocator::new(self.bucket(), key)
    }
}
