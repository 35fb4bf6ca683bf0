//! File storage port for profile pictures.
//!
//! The core never interprets image bytes; it stores the opaque reference the
//! backend returns.

use async_trait::async_trait;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist an opaque payload under a suggested name and return a
    /// retrievable reference.
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, FileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File storage failure: {0}")]
    Io(String),
}
