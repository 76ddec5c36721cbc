//! Test helpers: build AppState and router for integration tests.
//!
//! The metadata store is in memory; blobs go to a temporary directory (or an
//! in-memory store), so these tests need no database.

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtVerifier;
use tubely_api::middleware::ErrorDetailsConfig;
use tubely_api::services::ThumbnailUploadService;
use tubely_api::setup::routes;
use tubely_api::state::{AppState, UploadConfig};
use tubely_core::models::Video;
use tubely_core::OwnershipCheck;
use tubely_db::test_helpers::MockVideoStore;
use tubely_storage::test_helpers::MockStorage;
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

/// Upload limit used by the test app (small, so boundary tests stay cheap).
pub const TEST_MAX_THUMBNAIL_BYTES: usize = 4096;

pub struct TestApp {
    pub server: TestServer,
    pub videos: MockVideoStore,
    pub temp_dir: Option<TempDir>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a video owned by `user_id` and return it.
    pub fn seed_video(&self, user_id: Uuid) -> Video {
        let created = Utc::now() - chrono::Duration::hours(1);
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: "Boots".to_string(),
            description: Some("A pair of boots".to_string()),
            thumbnail_url: None,
            video_url: None,
            created_at: created,
            updated_at: created,
        };
        self.videos.insert(video.clone());
        video
    }

    /// Names of the files currently in the local asset directory.
    pub fn stored_files(&self) -> Vec<String> {
        let Some(dir) = &self.temp_dir else {
            return Vec::new();
        };
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn build_app(
    videos: MockVideoStore,
    storage: Arc<dyn Storage>,
    temp_dir: Option<TempDir>,
    ownership_check: OwnershipCheck,
) -> TestApp {
    let thumbnails =
        ThumbnailUploadService::new(Arc::new(videos.clone()), storage.clone(), ownership_check);

    let state = Arc::new(AppState {
        storage,
        thumbnails,
        jwt: Arc::new(JwtVerifier::new(auth::TEST_JWT_SECRET)),
        upload: UploadConfig {
            max_thumbnail_size_bytes: TEST_MAX_THUMBNAIL_BYTES,
        },
        error_details: ErrorDetailsConfig::new(false),
        assets_dir: temp_dir.as_ref().map(|d| d.path().to_path_buf()),
    });

    let server = TestServer::new(routes::build_router(state)).unwrap();

    TestApp {
        server,
        videos,
        temp_dir,
    }
}

/// Test app with local filesystem storage in a temporary directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(OwnershipCheck::AfterWrite).await
}

pub async fn setup_test_app_with(ownership_check: OwnershipCheck) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path(), ASSETS_BASE_URL.to_string())
        .await
        .unwrap();

    build_app(
        MockVideoStore::new(),
        Arc::new(storage),
        Some(temp_dir),
        ownership_check,
    )
}

/// Test app backed by an in-memory blob store the caller can inspect.
pub fn setup_test_app_with_mock_storage(storage: MockStorage) -> TestApp {
    build_app(
        MockVideoStore::new(),
        Arc::new(storage),
        None,
        OwnershipCheck::AfterWrite,
    )
}
