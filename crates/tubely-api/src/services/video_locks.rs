//! Per-video advisory locks
//!
//! Serializes the write-then-commit sequence of concurrent uploads for the
//! same video, so a record's thumbnail URL always points at the blob written
//! by the same upload. Entries nobody holds or awaits are pruned on every
//! acquire and release, including those left by a waiter that was cancelled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = HashMap<Uuid, Arc<AsyncMutex<()>>>;

#[derive(Clone, Default)]
pub struct VideoLocks {
    inner: Arc<Mutex<LockMap>>,
}

/// Held for the duration of one upload; releases the video on drop.
pub struct VideoLockGuard {
    video_id: Uuid,
    locks: VideoLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl VideoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_map(&self) -> MutexGuard<'_, LockMap> {
        // The map is only ever mutated by short non-panicking sections.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wait until no other upload holds `video_id`, then hold it.
    pub async fn acquire(&self, video_id: Uuid) -> VideoLockGuard {
        let lock = {
            let mut map = self.lock_map();
            prune_idle(&mut map);
            map.entry(video_id).or_default().clone()
        };
        let guard = lock.lock_owned().await;

        VideoLockGuard {
            video_id,
            locks: self.clone(),
            guard: Some(guard),
        }
    }

    /// Number of videos currently held or awaited
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drop entries where only the map's own reference is left: nobody holds or
/// waits. Holders keep a reference through their `OwnedMutexGuard`, waiters
/// through the pending `lock_owned` future.
fn prune_idle(map: &mut LockMap) {
    map.retain(|_, lock| Arc::strong_count(lock) > 1);
}

impl Drop for VideoLockGuard {
    fn drop(&mut self) {
        let mut map = self.locks.lock_map();
        self.guard.take();
        prune_idle(&mut map);
    }
}
