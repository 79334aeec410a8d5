//! Signed delivery URLs for stored videos.

use std::time::Duration;
use tracing::debug;
use tubely_models::StorageLocator;

use crate::error::StorageResult;
use crate::store::BlobStore;

/// Lifetime of a signed video URL (5 minutes).
pub const SIGNED_URL_EXPIRY_SECS: u64 = 300;

/// Lifetime of a signed video URL.
pub const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(SIGNED_URL_EXPIRY_SECS);

/// Turn a persisted locator into a short-lived URL.
///
/// An absent locator passes through as `None`.
pub async fn signed_video_url(
    store: &dyn BlobStore,
    locator: Option<&StorageLocator>,
) -> StorageResult<Option<String>> {
    let Some(locator) = locator else {
        return Ok(None);
    };

    debug!(bucket = %locator.bucket, key = %locator.key, "Signing video URL");
    let url = store.presign_get(locator, SIGNED_URL_EXPIRY).await?;
    Ok(Some(url))
}
