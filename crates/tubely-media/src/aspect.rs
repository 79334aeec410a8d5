//! Aspect-ratio classification of probed videos.

use tubely_models::AspectBucket;

use crate::error::{MediaError, MediaResult};
use crate::probe::VideoDimensions;

/// Bucket probed dimensions into an [`AspectBucket`].
pub fn classify_aspect(dims: &VideoDimensions) -> MediaResult<AspectBucket> {
    AspectBucket::from_dimensions(dims.width, dims.height)
        .ok_or_else(|| MediaError::invalid_video("Video stream has zero height"))
}
