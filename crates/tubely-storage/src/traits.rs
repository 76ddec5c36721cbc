//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys::AssetKey;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream handed to [`Storage::write`].
pub type AssetReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// upload path works against `Arc<dyn Storage>` without knowing the backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create or replace the object at `key` with the full contents of `reader`.
    ///
    /// Returns the number of bytes written. On error the previous object (if
    /// any) is left as it was; a partial write is never visible under `key`.
    async fn write(&self, key: &AssetKey, reader: AssetReader) -> StorageResult<u64>;

    /// Move the object at `from` to `to`, replacing whatever `to` held.
    ///
    /// `from` no longer exists afterwards. On error `to` is left as it was.
    async fn promote(&self, from: &AssetKey, to: &AssetKey) -> StorageResult<()>;

    /// Public URL under which the object at `key` is served.
    fn url_for(&self, key: &AssetKey) -> String;

    /// Read the whole object at `key`
    async fn read(&self, key: &AssetKey) -> StorageResult<Bytes>;

    /// Check if an object exists
    async fn exists(&self, key: &AssetKey) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
