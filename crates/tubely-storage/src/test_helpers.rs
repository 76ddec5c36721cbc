//! In-memory storage backend for tests.

use crate::keys::AssetKey;
use crate::traits::{AssetReader, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;

/// Storage double that keeps objects in a map and counts writes.
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `write` fail with `WriteFailed`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `write` calls made, successful or not.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn write(&self, key: &AssetKey, mut reader: AssetReader) -> StorageResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected write failure".to_string()));
        }

        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let size = buffer.len() as u64;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from(buffer));
        Ok(size)
    }

    async fn promote(&self, from: &AssetKey, to: &AssetKey) -> StorageResult<()> {
        let mut objects = self.objects.lock().unwrap();
        let data = objects
            .remove(from.as_str())
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        objects.insert(to.to_string(), data);
        Ok(())
    }

    fn url_for(&self, key: &AssetKey) -> String {
        format!("memory://assets/{}", key)
    }

    async fn read(&self, key: &AssetKey) -> StorageResult<Bytes> {
        self.get(key.as_str())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &AssetKey) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key.as_str()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
