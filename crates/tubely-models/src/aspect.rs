//! Aspect-ratio buckets used to namespace stored videos.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exclusive ratio window for 16:9 content.
const LANDSCAPE_RANGE: (f64, f64) = (1.77, 1.79);

/// Exclusive ratio window for 9:16 content.
const PORTRAIT_RANGE: (f64, f64) = (0.56, 0.57);

/// Aspect-ratio category of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AspectBucket {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    /// Anything else
    Other,
}

impl AspectBucket {
    /// Classify a width/height ratio.
    ///
    /// Windows are open intervals: a ratio sitting exactly on a bound is `Other`.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > LANDSCAPE_RANGE.0 && ratio < LANDSCAPE_RANGE.1 {
            AspectBucket::Landscape
        } else if ratio > PORTRAIT_RANGE.0 && ratio < PORTRAIT_RANGE.1 {
            AspectBucket::Portrait
        } else {
            AspectBucket::Other
        }
    }

    /// Classify from pixel dimensions. Returns `None` for a zero height.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        Some(Self::from_ratio(width as f64 / height as f64))
    }

    /// Key prefix in object storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectBucket::Landscape => "landscape",
            AspectBucket::Portrait => "portrait",
            AspectBucket::Other => "other",
        }
    }
}

impl fmt::Display for AspectBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_resolutions() {
        assert_eq!(AspectBucket::from_dimensions(1920, 1080), Some(AspectBucket::Landscape));
        assert_eq!(AspectBucket::from_dimensions(1280, 720), Some(AspectBucket::Landscape));
        assert_eq!(AspectBucket::from_dimensions(1080, 1920), Some(AspectBucket::Portrait));
        assert_eq!(AspectBucket::from_dimensions(720, 1280), Some(AspectBucket::Portrait));
        assert_eq!(AspectBucket::from_dimensions(640, 480), Some(AspectBucket::Other));
        assert_eq!(AspectBucket::from_dimensions(1080, 1080), Some(AspectBucket::Other));
    }

    #[test]
    fn test_bounds_are_exclusive() {
        assert_eq!(AspectBucket::from_ratio(1.77), AspectBucket::Other);
        assert_eq!(AspectBucket::from_ratio(1.79), AspectBucket::Other);
        assert_eq!(AspectBucket::from_ratio(0.56), AspectBucket::Other);
        assert_eq!(AspectBucket::from_ratio(0.57), AspectBucket::Other);
    }

    #[test]
    fn test_just_inside_bounds() {
        assert_eq!(AspectBucket::from_ratio(1.7701), AspectBucket::Landscape);
        assert_eq!(AspectBucket::from_ratio(1.7899), AspectBucket::Landscape);
        assert_eq!(AspectBucket::from_ratio(0.5601), AspectBucket::Portrait);
        assert_eq!(AspectBucket::from_ratio(0.5699), AspectBucket::Portrait);
    }

    #[test]
    fn test_sweep_matches_windows() {
        // 0.0 to 3.0 in steps of 0.0005
        for i in 0..=6000 {
            let r = i as f64 * 0.0005;
            let expected = if r > 1.77 && r < 1.79 {
                AspectBucket::Landscape
            } else if r > 0.56 && r < 0.57 {
                AspectBucket::Portrait
            } else {
                AspectBucket::Other
            };
            assert_eq!(AspectBucket::from_ratio(r), expected, "ratio {}", r);
        }
    }

    #[test]
    fn test_zero_height() {
        assert_eq!(AspectBucket::from_dimensions(1920, 0), None);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(AspectBucket::Landscape.as_str(), "landscape");
        assert_eq!(AspectBucket::Portrait.as_str(), "portrait");
        assert_eq!(AspectBucket::Other.as_str(), "other");
    }
}
