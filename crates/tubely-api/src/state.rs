//! Application state shared by handlers.

use crate::auth::JwtVerifier;
use crate::middleware::ErrorDetailsConfig;
use crate::services::ThumbnailUploadService;
use axum::extract::FromRef;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_storage::Storage;

/// Limits applied while reading uploads
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_thumbnail_size_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub thumbnails: ThumbnailUploadService,
    pub jwt: Arc<JwtVerifier>,
    pub upload: UploadConfig,
    pub error_details: ErrorDetailsConfig,
    /// Root served under `/assets` when blobs live on the local filesystem
    pub assets_dir: Option<PathBuf>,
}

impl FromRef<Arc<AppState>> for ThumbnailUploadService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.thumbnails.clone()
    }
}

impl FromRef<Arc<AppState>> for UploadConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.upload.clone()
    }
}
