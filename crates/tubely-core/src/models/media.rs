use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Media types accepted for video thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ThumbnailMediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl ThumbnailMediaType {
    /// Look up a canonical (already parsed, lowercased, parameter-free) media type.
    pub fn from_canonical(media_type: &str) -> Option<Self> {
        match media_type {
            "image/jpeg" => Some(ThumbnailMediaType::Jpeg),
            "image/png" => Some(ThumbnailMediaType::Png),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailMediaType::Jpeg => "image/jpeg",
            ThumbnailMediaType::Png => "image/png",
        }
    }

    /// File extension used for storage keys
    pub fn extension(&self) -> &'static str {
        match self {
            ThumbnailMediaType::Jpeg => "jpg",
            ThumbnailMediaType::Png => "png",
        }
    }
}

impl Display for ThumbnailMediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A validated thumbnail waiting to be written to storage.
#[derive(Debug, Clone)]
pub struct UploadedThumbnail {
    pub data: Bytes,
    pub media_type: ThumbnailMediaType,
}

impl UploadedThumbnail {
    pub fn new(data: impl Into<Bytes>, media_type: ThumbnailMediaType) -> Self {
        Self {
            data: data.into(),
            media_type,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
