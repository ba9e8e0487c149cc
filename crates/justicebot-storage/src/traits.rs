//! Object store seam used by the upload transport.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use justicebot_core::TransportError;
use thiserror::Error;

/// Failures reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for TransportError {
    fn from(err: StorageError) -> Self {
        TransportError::Storage(err.to_string())
    }
}

/// Durable home for uploaded evidence.
///
/// The upload transport writes through this trait and never talks to a
/// specific provider. Any backend error is surfaced to the caller verbatim.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `storage_key` and return the download URL.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Read back the object stored at `storage_key`
    async fn download(&self, storage_key: &str) -> StorageResult<Bytes>;

    fn backend_type(&self) -> StorageBackend;
}
