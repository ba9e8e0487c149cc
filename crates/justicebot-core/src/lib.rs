//! JusticeBot Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation rules shared by the evidence upload pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{StorageConfig, UploadConfig};
pub use error::{LogLevel, PreviewError, TransportError, UploadError, ValidationError};
pub use models::{
    FileHandle, FileId, FileStatus, Notification, NotificationVariant, QueueSnapshot,
    TrackedFile, TrackedFileView, UploadCategory, UploadResult, UserId,
};
pub use storage_types::StorageBackend;
