//! Per-file upload lifecycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::file::{FileHandle, FileId};

/// Reference to an object written by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Download locator for the stored object
    pub url: String,
    /// Original file name, not the storage key
    pub file_name: String,
    pub size: u64,
    pub content_type: String,
    pub storage_key: String,
}

/// Where a file is in its lifecycle. Exactly one state holds at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Uploading,
    Uploaded(UploadResult),
    Failed(String),
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Uploading => "uploading",
            FileStatus::Uploaded(_) => "uploaded",
            FileStatus::Failed(_) => "failed",
        }
    }
}

/// One file under management by the upload queue.
#[derive(Debug, Clone)]
pub struct TrackedFile {
    pub id: FileId,
    pub file: FileHandle,
    /// `data:` URL, images only
    pub preview: Option<Arc<str>>,
    progress: u8,
    status: FileStatus,
}

impl TrackedFile {
    pub fn new(id: FileId, file: FileHandle, preview: Option<String>) -> Self {
        Self {
            id,
            file,
            preview: preview.map(Arc::from),
            progress: 0,
            status: FileStatus::Pending,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> &FileStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, FileStatus::Pending)
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, FileStatus::Uploading)
    }

    pub fn uploaded(&self) -> bool {
        matches!(self.status, FileStatus::Uploaded(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&UploadResult> {
        match &self.status {
            FileStatus::Uploaded(result) => Some(result),
            _ => None,
        }
    }

    /// `Pending -> Uploading`. Returns false for any other starting state.
    pub fn start_upload(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = FileStatus::Uploading;
        self.progress = 0;
        true
    }

    /// Add one synthetic progress step, never passing `cap` and never moving backwards.
    pub fn advance_progress(&mut self, step: u8, cap: u8) -> bool {
        if !self.is_uploading() {
            return false;
        }
        let next = self.progress.saturating_add(step).min(cap).max(self.progress);
        let changed = next != self.progress;
        self.progress = next;
        changed
    }

    pub fn complete(&mut self, result: UploadResult) {
        self.progress = 100;
        self.status = FileStatus::Uploaded(result);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.progress = 0;
        self.status = FileStatus::Failed(message.into());
    }

    /// `Uploading -> Pending` for a transfer abandoned before it settled.
    pub fn cancel_upload(&mut self) -> bool {
        if !self.is_uploading() {
            return false;
        }
        self.progress = 0;
        self.status = FileStatus::Pending;
        true
    }

    /// `Failed -> Pending` with progress cleared. Other states are left alone.
    pub fn reset_for_retry(&mut self) -> bool {
        if self.error().is_none() {
            return false;
        }
        self.progress = 0;
        self.status = FileStatus::Pending;
        true
    }
}
