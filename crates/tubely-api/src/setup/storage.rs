//! Storage setup and initialization

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};
use tubely_storage::{create_storage, Storage};

/// Build the configured blob store. For the local backend also return the
/// directory to serve under `/assets`.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Option<PathBuf>)> {
    let storage = create_storage(config).await?;
    let backend_type = storage.backend_type();
    tracing::info!(backend = %backend_type, "Storage initialized");

    let assets_dir = match backend_type {
        StorageBackend::Local => config.local_storage_path().map(PathBuf::from),
        StorageBackend::S3 => None,
    };

    Ok((storage, assets_dir))
}
