//! Asset key derivation.
//!
//! Key format: `{video_id}.{extension}`, where the extension comes from the
//! thumbnail's media type. Derivation is pure; the same inputs always produce
//! the same key.
//!
//! Staging keys (`{key}.{uuid}.staged`) hold an upload until it is allowed to
//! replace the object under its final key.

use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::models::ThumbnailMediaType;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Relative location of an asset inside a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    /// Build a key from an arbitrary relative path, rejecting anything that
    /// could escape the storage root or name a hidden file.
    pub fn parse(key: impl Into<String>) -> StorageResult<Self> {
        let key = key.into();
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' contains invalid characters",
                key
            )));
        }
        Ok(AssetKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Key of the thumbnail for `video_id`.
pub fn thumbnail_key(video_id: Uuid, media_type: ThumbnailMediaType) -> AssetKey {
    // A hyphenated UUID followed by a fixed extension is always a valid key.
    AssetKey(format!("{}.{}", video_id, media_type.extension()))
}

/// Unique sibling of `key` that an upload is written to before promotion.
pub fn staging_key(key: &AssetKey) -> AssetKey {
    AssetKey(format!("{}.{}.staged", key, Uuid::new_v4()))
}
