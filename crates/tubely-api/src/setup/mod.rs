//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtVerifier;
use crate::middleware::ErrorDetailsConfig;
use crate::services::ThumbnailUploadService;
use crate::state::{AppState, UploadConfig};
use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        ownership_check = %config.ownership_check(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let (storage, assets_dir) = storage::setup_storage(&config).await?;

    let videos = Arc::new(VideoRepository::new(pool));
    let thumbnails =
        ThumbnailUploadService::new(videos, storage.clone(), config.ownership_check());

    let state = Arc::new(AppState {
        storage,
        thumbnails,
        jwt: Arc::new(JwtVerifier::new(config.jwt_secret())),
        upload: UploadConfig {
            max_thumbnail_size_bytes: config.max_thumbnail_size_bytes(),
        },
        error_details: ErrorDetailsConfig::new(config.is_production()),
        assets_dir,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
