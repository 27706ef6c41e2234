//! Images written under a media root on the local filesystem.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use yatube_core::ports::{ImageUpload, MediaError, MediaStorage};

pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored relative path, refusing anything that escapes the root.
    fn resolve(&self, relative: &str) -> Result<PathBuf, MediaError> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(MediaError::Storage(format!("refusing path `{relative}`")));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, folder: &str, upload: &ImageUpload) -> Result<String, MediaError> {
        let relative = format!("{folder}/{}.{}", Uuid::new_v4(), upload.extension());
        let path = self.resolve(&relative)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MediaError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&path, upload.bytes())
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = upload.bytes().len(), "Image stored");
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), MediaError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("yatube-media-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let storage = LocalMediaStorage::new(temp_root());
        let upload = ImageUpload::new("image/gif", GIF.to_vec()).unwrap();

        let path = storage.store("posts", &upload).await.unwrap();
        assert!(path.starts_with("posts/"));
        assert!(path.ends_with(".gif"));

        let on_disk = tokio::fs::read(storage.root().join(&path)).await.unwrap();
        assert_eq!(on_disk, GIF);

        storage.remove(&path).await.unwrap();
        assert!(!storage.root().join(&path).exists());
        // Removing twice is fine.
        storage.remove(&path).await.unwrap();

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let storage = LocalMediaStorage::new(temp_root());
        assert!(storage.remove("../etc/passwd").await.is_err());
        assert!(storage.remove("/etc/passwd").await.is_err());
    }
}
