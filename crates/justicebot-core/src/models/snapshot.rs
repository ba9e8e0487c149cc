//! Read-only queue state handed to UI collaborators.

use std::sync::Arc;

use serde::Serialize;

use super::file::FileId;
use super::tracked::{TrackedFile, UploadResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedFileView {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Arc<str>>,
    pub progress: u8,
    pub status: &'static str,
    pub uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<UploadResult>,
}

impl From<&TrackedFile> for TrackedFileView {
    fn from(file: &TrackedFile) -> Self {
        Self {
            id: file.id.clone(),
            name: file.file.name().to_string(),
            size: file.file.size(),
            content_type: file.file.content_type().to_string(),
            preview: file.preview.clone(),
            progress: file.progress(),
            status: file.status().label(),
            uploaded: file.uploaded(),
            error: file.error().map(str::to_string),
            result: file.result().cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueSnapshot {
    pub files: Vec<TrackedFileView>,
    pub is_uploading: bool,
    pub has_files: bool,
    pub has_uploaded_files: bool,
    pub has_failed_files: bool,
}

impl QueueSnapshot {
    pub fn new<'a>(files: impl IntoIterator<Item = &'a TrackedFile>, is_uploading: bool) -> Self {
        let files: Vec<TrackedFileView> = files.into_iter().map(TrackedFileView::from).collect();
        Self {
            has_files: !files.is_empty(),
            has_uploaded_files: files.iter().any(|f| f.uploaded),
            has_failed_files: files.iter().any(|f| f.error.is_some()),
            files,
            is_uploading,
        }
    }

    pub fn get(&self, id: &FileId) -> Option<&TrackedFileView> {
        self.files.iter().find(|f| &f.id == id)
    }

    pub fn uploaded_count(&self) -> usize {
        self.files.iter().filter(|f| f.uploaded).count()
    }

    /// Uploaded files whose content type is an image.
    pub fn uploaded_image_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.uploaded && f.content_type.to_lowercase().starts_with("image/"))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}
