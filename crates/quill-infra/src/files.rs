//! Disk-backed file store for profile pictures.
//!
//! Payload bytes are opaque; the returned reference is the path relative to
//! the media root, which the deployment serves however it likes.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::ports::{FileError, FileStore};

const PROFILE_DIR: &str = "images/profile_pictures";

/// Stores files under a media root directory.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        let root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        Self::new(root)
    }

    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        if cleaned.is_empty() {
            "file".to_string()
        } else {
            cleaned
        }
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, FileError> {
        let reference = format!(
            "{PROFILE_DIR}/{}-{}",
            Uuid::new_v4().simple(),
            Self::sanitize(name)
        );
        let path = self.root.join(&reference);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::Io(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| FileError::Io(e.to_string()))?;

        tracing::debug!(reference = %reference, size = bytes.len(), "Stored file");
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(DiskFileStore::sanitize("../../etc/passwd"), "....etcpasswd");
        assert_eq!(DiskFileStore::sanitize("avatar.png"), "avatar.png");
        assert_eq!(DiskFileStore::sanitize("🦀"), "file");
    }

    #[tokio::test]
    async fn store_writes_under_the_root() {
        let dir = std::env::temp_dir().join(format!("quill-files-{}", Uuid::new_v4()));
        let store = DiskFileStore::new(&dir);

        let reference = store.store("avatar.png", b"not-a-real-png").await.unwrap();
        assert!(reference.starts_with(PROFILE_DIR));

        let written = tokio::fs::read(dir.join(&reference)).await.unwrap();
        assert_eq!(written, b"not-a-real-png");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
