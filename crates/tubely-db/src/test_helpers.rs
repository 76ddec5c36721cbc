//! In-memory video store for tests.

use crate::db::VideoStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Video store double backed by a `HashMap`.
#[derive(Clone, Default)]
pub struct MockVideoStore {
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
    gets: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
    fail_updates: Arc<AtomicBool>,
}

impl MockVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    /// Current stored copy of a record.
    pub fn snapshot(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    /// Make every subsequent `update` fail.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoStore for MockVideoStore {
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot(id))
    }

    async fn update(&self, video: &Video) -> Result<(), AppError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected update failure".to_string()));
        }

        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }
}
