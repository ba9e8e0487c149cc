//! Upload transport: one file's bytes to durable storage.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use justicebot_core::{FileHandle, TransportError, UploadCategory, UploadResult, UserId};
use justicebot_storage::keys::generate_upload_key;
use justicebot_storage::Storage;

/// Moves a file to remote storage and returns a reference to it.
///
/// Implementations never retry and never touch queue state. Calling twice
/// for the same file creates two distinct objects.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn upload(
        &self,
        file: &FileHandle,
        user_id: &UserId,
        category: UploadCategory,
    ) -> Result<UploadResult, TransportError>;
}

/// [`Transport`] over any [`Storage`] backend.
///
/// Key timestamps are strictly increasing per transport (clones share the
/// sequence), so same-name files started in the same millisecond still get
/// distinct keys.
#[derive(Clone)]
pub struct StorageTransport {
    storage: Arc<dyn Storage>,
    last_timestamp_ms: Arc<AtomicI64>,
}

impl StorageTransport {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            last_timestamp_ms: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Wall-clock millis, bumped past the previously issued value when needed.
    fn next_timestamp_ms(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_timestamp_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

#[async_trait]
impl Transport for StorageTransport {
    async fn upload(
        &self,
        file: &FileHandle,
        user_id: &UserId,
        category: UploadCategory,
    ) -> Result<UploadResult, TransportError> {
        let data = file.read().await.map_err(|source| TransportError::Read {
            file_name: file.name().to_string(),
            source,
        })?;

        let storage_key =
            generate_upload_key(category, user_id, self.next_timestamp_ms(), file.name());
        let size = data.len() as u64;

        let url = self
            .storage
            .upload_with_key(&storage_key, data, file.content_type())
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    key = %storage_key,
                    backend = %self.storage.backend_type(),
                    "Failed to upload to storage"
                );
                TransportError::from(e)
            })?;

        tracing::info!(
            key = %storage_key,
            size_bytes = size,
            "Upload to storage successful"
        );

        Ok(UploadResult {
            url,
            file_name: file.name().to_string(),
            size,
            content_type: file.content_type().to_string(),
            storage_key,
        })
    }
}
