//! Tubely Storage Library
//!
//! Blob storage for video assets: the `Storage` trait, a local filesystem
//! backend and an S3 backend.
//!
//! # Storage key format
//!
//! Thumbnail keys are `{video_id}.{extension}` (see [`keys::thumbnail_key`]).
//! Re-uploading a thumbnail of the same type for the same video overwrites the
//! same object. Keys must not contain `..`, nor start with `/` or `.`.
//!
//! Uploads that still need an ownership check go to a unique staging key first
//! (see [`keys::staging_key`]) and are moved over the final key with
//! [`Storage::promote`].

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{staging_key, thumbnail_key, AssetKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{AssetReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
