//! Error types module
//!
//! Errors raised along the upload pipeline. Every one of them is caught at the
//! queue boundary and turned into per-file state or a notification; none of
//! them is meant to escape to the UI as a failure.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like validation rejections
    Debug,
    /// Warning level - for recoverable issues like a failed preview or transfer
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// A file was refused at intake. The display text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File size must be less than {max_mb}MB")]
    FileTooLarge { size: u64, max_mb: usize },

    #[error("File type not supported. Please upload images, PDFs, or text files.")]
    UnsupportedType(String),
}

/// Preview generation failed. Never a rejection condition.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("File is not an image: {0}")]
    NotAnImage(String),

    #[error("Failed to read {file_name} for preview: {source}")]
    Read {
        file_name: String,
        #[source]
        source: io::Error,
    },
}

/// Moving a file's bytes to remote storage failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to read {file_name}: {source}")]
    Read {
        file_name: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Storage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Authentication required: please log in again")]
    AuthenticationRequired,

    #[error("All files have already been uploaded or have errors.")]
    NothingToUpload,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl UploadError {
    /// Whether the user can fix this by trying again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            UploadError::AuthenticationRequired => true,
            UploadError::NothingToUpload => false,
            UploadError::Validation(_) => false,
            UploadError::Preview(_) => false,
            UploadError::Transport(_) => true,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Validation(_) | UploadError::NothingToUpload => LogLevel::Debug,
            UploadError::AuthenticationRequired | UploadError::Preview(_) => LogLevel::Warn,
            UploadError::Transport(_) => LogLevel::Error,
        }
    }

    /// Notification title used when this error is surfaced to the user.
    pub fn title(&self) -> &'static str {
        match self {
            UploadError::AuthenticationRequired => "Authentication Required",
            UploadError::NothingToUpload => "No Files to Upload",
            UploadError::Validation(_) => "Invalid File",
            UploadError::Preview(_) => "Preview Unavailable",
            UploadError::Transport(_) => "Upload Failed",
        }
    }
}
