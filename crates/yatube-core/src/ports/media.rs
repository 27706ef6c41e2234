//! Media storage port for post images.

use async_trait::async_trait;

/// A decoded image attached to a post submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub const ALLOWED_TYPES: [&'static str; 5] = [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/gif",
        "image/webp",
    ];

    /// Accept an upload only if its declared type is allowed and its bytes
    /// actually start like an image of that kind.
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Result<Self, MediaError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !Self::ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(MediaError::UnsupportedType(content_type));
        }
        if bytes.is_empty() {
            return Err(MediaError::NotAnImage);
        }

        let matches = match content_type.as_str() {
            "image/jpeg" | "image/jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            "image/png" => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            "image/gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            "image/webp" => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
            _ => false,
        };
        if !matches {
            return Err(MediaError::NotAnImage);
        }

        Ok(Self {
            content_type,
            bytes,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Where post images live. Returned paths are relative to the media root.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist an image under `folder` and return its relative path.
    async fn store(&self, folder: &str, upload: &ImageUpload) -> Result<String, MediaError>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Uploaded file is not a valid image")]
    NotAnImage,

    #[error("Storage error: {0}")]
    Storage(String),
}
