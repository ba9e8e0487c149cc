//! Backend selection from [`StorageConfig`].

#[cfg(feature = "storage-local")]
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use justicebot_core::StorageConfig;

/// Which backend a configuration asks for.
///
/// An explicit `STORAGE_BACKEND` wins. Otherwise a configured bucket means S3;
/// with neither set, files go to the local filesystem.
pub fn resolve_backend(config: &StorageConfig) -> StorageBackend {
    match (config.storage_backend(), config.s3_bucket()) {
        (Some(backend), _) => backend,
        (None, Some(_)) => StorageBackend::S3,
        (None, None) => StorageBackend::Local,
    }
}

/// Build the backend chosen by [`resolve_backend`].
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let backend = resolve_backend(config);
    tracing::info!(backend = %backend, "Initializing evidence storage");

    match backend {
        StorageBackend::S3 => s3_backend(config).await,
        StorageBackend::Local => local_backend(config).await,
    }
}

#[cfg(feature = "storage-s3")]
async fn s3_backend(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config
        .s3_bucket()
        .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
    let region = config.s3_region().or(config.aws_region()).ok_or_else(|| {
        StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
    })?;
    let endpoint = config
        .s3_endpoint()
        .map(|url| normalize_base_url(url, "S3_ENDPOINT"))
        .transpose()?;

    let storage = S3Storage::new(bucket.to_string(), region.to_string(), endpoint).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-s3"))]
async fn s3_backend(_config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "S3 storage requires the storage-s3 feature".to_string(),
    ))
}

#[cfg(feature = "storage-local")]
async fn local_backend(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let root = config.local_storage_path().ok_or_else(|| {
        StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
    })?;

    tokio::fs::create_dir_all(root).await?;
    let base_url = match config.local_storage_base_url() {
        Some(url) => normalize_base_url(url, "LOCAL_STORAGE_BASE_URL")?,
        None => file_url(Path::new(root)).await?,
    };

    let storage = LocalStorage::new(root, base_url).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
async fn local_backend(_config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage requires the storage-local feature".to_string(),
    ))
}

/// Trim whitespace and trailing slashes; only http, https and file URLs are served.
pub fn normalize_base_url(url: &str, setting: &str) -> StorageResult<String> {
    let url = url.trim().trim_end_matches('/');
    let scheme_ok = ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme));

    if !scheme_ok {
        return Err(StorageError::ConfigError(format!(
            "{} must be an http(s) or file URL, got {:?}",
            setting, url
        )));
    }
    Ok(url.to_string())
}

/// `file://` URL of the storage root, used when no base URL is configured.
#[cfg(feature = "storage-local")]
async fn file_url(root: &Path) -> StorageResult<String> {
    let absolute = tokio::fs::canonicalize(root).await?;
    Ok(format!("file://{}", absolute.display()))
}
