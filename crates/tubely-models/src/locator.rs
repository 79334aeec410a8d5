//! Storage locator: the (bucket, key) pair of a stored object.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Separator between bucket and key in the persisted form.
const SEPARATOR: char = ',';

/// Reference to an object in the object store.
///
/// Persisted as `"<bucket>,<key>"`. Bucket names cannot contain a comma, so
/// the first comma always splits the pair and keys may contain any character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    pub bucket: String,
    pub key: String,
}

impl StorageLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Encode to the persisted form.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.key)
    }
}

impl FromStr for StorageLocator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, key) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| ModelError::InvalidLocator(s.to_string()))?;

        if bucket.is_empty() || key.is_empty() {
            return Err(ModelError::InvalidLocator(s.to_string()));
        }

        Ok(Self::new(bucket, key))
    }
}

impl Serialize for StorageLocator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StorageLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
