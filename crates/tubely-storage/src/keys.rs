//! Object key generation.
//!
//! Keys are `<aspect>/<name>.<ext>` where `name` is 32 bytes from the OS
//! CSPRNG encoded as unpadded URL-safe base64 (43 characters).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::TryRngCore;
use tubely_models::{AspectBucket, MediaType};

use crate::error::{StorageError, StorageResult};

/// Random bytes per generated name.
pub const RANDOM_NAME_BYTES: usize = 32;

/// Generate an unpredictable file name with the given extension.
///
/// Fails if the OS random source is unavailable; there is no fallback.
pub fn random_file_name(extension: &str) -> StorageResult<String> {
    let mut buf = [0u8; RANDOM_NAME_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| StorageError::RandomUnavailable(e.to_string()))?;

    Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(buf), extension))
}

/// Object key for a processed video.
pub fn video_object_key(aspect: AspectBucket, media_type: MediaType) -> StorageResult<String> {
    let name = random_file_name(media_type.extension())?;
    Ok(format!("{}/{}", aspect.as_str(), name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_name_shape() {
        let name = random_file_name("mp4").unwrap();
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "mp4");
        assert_eq!(stem.len(), 43);
        assert_eq!(URL_SAFE_NO_PAD.decode(stem).unwrap().len(), RANDOM_NAME_BYTES);
    }

    #[test]
    fn test_no_duplicates_and_url_safe() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let name = random_file_name("mp4").unwrap();
            let stem = name.trim_end_matches(".mp4");
            assert!(stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            assert!(URL_SAFE_NO_PAD.decode(stem).is_ok());
            assert!(seen.insert(name));
        }
    }

    #[test]
    fn test_video_key_prefix() {
        let key = video_object_key(AspectBucket::Landscape, MediaType::VideoMp4).unwrap();
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));

        let key = video_object_key(AspectBucket::Portrait, MediaType::VideoMp4).unwrap();
        assert!(key.starts_with("portrait/"));

        let key = video_object_key(AspectBucket::Other, MediaType::VideoMp4).unwrap();
        assert!(key.starts_with("other/"));
    }
}
