//! Configuration module
//!
//! Upload and storage settings, read from the environment (and a `.env` file
//! when present).

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PROGRESS_CAP,
    DEFAULT_PROGRESS_STEP, DEFAULT_PROGRESS_TICK_MS,
};
use crate::models::UploadCategory;
use crate::storage_types::StorageBackend;

/// Intake and queue configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    // Synthetic progress
    pub progress_tick: Duration,
    pub progress_step: u8,
    pub progress_cap: u8,
    /// Destination category used by `upload_files`
    pub category: UploadCategory,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: (DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024) as u64,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            progress_tick: Duration::from_millis(DEFAULT_PROGRESS_TICK_MS),
            progress_step: DEFAULT_PROGRESS_STEP,
            progress_cap: DEFAULT_PROGRESS_CAP,
            category: UploadCategory::Evidence,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB as u64);
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!("MAX_FILE_SIZE_MB={} is too large", max_file_size_mb)
            })?;

        let allowed_content_types = match lookup("ALLOWED_CONTENT_TYPES") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_content_types,
        };

        let category = match lookup("UPLOAD_CATEGORY") {
            Some(value) => value.parse()?,
            None => defaults.category,
        };

        let config = UploadConfig {
            max_file_size_bytes,
            allowed_content_types,
            progress_tick: Duration::from_millis(
                lookup("UPLOAD_PROGRESS_TICK_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_PROGRESS_TICK_MS),
            ),
            progress_step: lookup("UPLOAD_PROGRESS_STEP")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PROGRESS_STEP),
            progress_cap: lookup("UPLOAD_PROGRESS_CAP")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PROGRESS_CAP),
            category,
        };

        config.validate()?;

        tracing::debug!(
            max_file_size_mb = config.max_file_size_mb(),
            allowed_content_types = config.allowed_content_types.len(),
            category = %config.category,
            "Loaded upload configuration"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        if self.progress_tick.is_zero() {
            return Err(anyhow::anyhow!(
                "UPLOAD_PROGRESS_TICK_MS must be greater than 0"
            ));
        }

        // 100 is reserved for completed transfers
        if self.progress_cap >= 100 {
            return Err(anyhow::anyhow!("UPLOAD_PROGRESS_CAP must be below 100"));
        }

        Ok(())
    }

    /// Size limit in whole megabytes, as shown in rejection messages.
    pub fn max_file_size_mb(&self) -> usize {
        (self.max_file_size_bytes / 1024 / 1024) as usize
    }
}

/// Object store configuration
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORAGE_BACKEND") {
            Some(value) => Some(value.parse::<StorageBackend>()?),
            None => None,
        };

        Ok(StorageConfig {
            backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
        })
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }
}
