//! Media storage that keeps images in memory, for tests and database-less runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{ImageUpload, MediaError, MediaStorage};

#[derive(Default)]
pub struct InMemoryMediaStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    counter: AtomicU64,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.files.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn store(&self, folder: &str, upload: &ImageUpload) -> Result<String, MediaError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let path = format!("{folder}/{n}.{}", upload.extension());
        self.files
            .write()
            .await
            .insert(path.clone(), upload.bytes().to_vec());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), MediaError> {
        self.files.write().await.remove(path);
        Ok(())
    }
}
