//! File intake: validation, previews and identity.

use justicebot_core::validation::validate_file;
use justicebot_core::{
    FileHandle, FileId, Notification, TrackedFile, UploadConfig, UploadError, ValidationError,
};

use crate::notify::log_error;
use crate::preview::create_image_preview;

/// A file refused at intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub error: ValidationError,
}

impl Rejection {
    pub fn notification(&self) -> Notification {
        let err = UploadError::from(self.error.clone());
        Notification::destructive(err.title(), format!("{}: {}", self.file_name, err))
    }
}

#[derive(Debug, Default)]
pub struct IntakeReport {
    /// New pending entries, in arrival order
    pub accepted: Vec<TrackedFile>,
    pub rejected: Vec<Rejection>,
}

/// Turns raw file handles into pending [`TrackedFile`]s.
#[derive(Debug, Clone)]
pub struct FileIntake {
    config: UploadConfig,
}

impl FileIntake {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Validate every file and build previews for accepted images.
    ///
    /// A preview that cannot be read is logged and skipped; it never rejects
    /// the file. Ids are `{name}-{last_modified}` and are not yet unique: the
    /// queue resolves collisions when it merges the report.
    pub async fn process(&self, files: Vec<FileHandle>) -> IntakeReport {
        let mut report = IntakeReport::default();

        for file in files {
            if let Err(error) = validate_file(&file, &self.config) {
                log_error(&UploadError::from(error.clone()), file.name());
                report.rejected.push(Rejection {
                    file_name: file.name().to_string(),
                    error,
                });
                continue;
            }

            let preview = if file.is_image() {
                match create_image_preview(&file).await {
                    Ok(preview) => Some(preview),
                    Err(e) => {
                        log_error(&UploadError::from(e), file.name());
                        None
                    }
                }
            } else {
                None
            };

            let id = FileId::derive(file.name(), file.last_modified());
            report.accepted.push(TrackedFile::new(id, file, preview));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    #[tokio::test]
    async fn splits_accepted_and_rejected() {
        let intake = FileIntake::new(UploadConfig::default());
        let report = intake
            .process(vec![
                FileHandle::from_bytes("lease.pdf", "application/pdf", 1, vec![0u8; 2 * MB]),
                FileHandle::from_bytes("huge.png", "image/png", 2, vec![0u8; 15 * MB]),
                FileHandle::from_bytes("movie.mp4", "video/mp4", 3, vec![0u8; 10]),
                FileHandle::from_bytes("photo.jpg", "image/jpeg", 4, b"jpeg".to_vec()),
            ])
            .await;

        let accepted: Vec<&str> = report.accepted.iter().map(|f| f.file.name()).collect();
        assert_eq!(accepted, vec!["lease.pdf", "photo.jpg"]);

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(
            report.rejected[0].notification().description,
            "huge.png: File size must be less than 10MB"
        );
        assert_eq!(
            report.rejected[1].notification().description,
            "movie.mp4: File type not supported. Please upload images, PDFs, or text files."
        );
        assert!(report.rejected[0].notification().is_destructive());
    }

    #[tokio::test]
    async fn previews_only_for_images() {
        let intake = FileIntake::new(UploadConfig::default());
        let report = intake
            .process(vec![
                FileHandle::from_bytes("notes.txt", "text/plain", 1, b"hello".to_vec()),
                FileHandle::from_bytes("scan.webp", "image/webp", 2, b"RIFF".to_vec()),
            ])
            .await;

        assert!(report.accepted[0].preview.is_none());
        let preview = report.accepted[1].preview.as_deref().unwrap();
        assert!(preview.starts_with("data:image/webp;base64,"));
    }

    #[tokio::test]
    async fn unreadable_image_is_accepted_without_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evidence.png");
        tokio::fs::write(&path, b"png").await.unwrap();
        let file = FileHandle::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let report = FileIntake::new(UploadConfig::default())
            .process(vec![file])
            .await;

        assert!(report.rejected.is_empty());
        assert_eq!(report.accepted.len(), 1);
        assert!(report.accepted[0].preview.is_none());
        assert!(report.accepted[0].is_pending());
        assert_eq!(report.accepted[0].progress(), 0);
    }

    #[tokio::test]
    async fn ids_come_from_name_and_timestamp() {
        let report = FileIntake::new(UploadConfig::default())
            .process(vec![FileHandle::from_bytes(
                "lease.pdf",
                "application/pdf",
                1_700_000_000_000,
                b"%PDF".to_vec(),
            )])
            .await;

        assert_eq!(report.accepted[0].id.as_str(), "lease.pdf-1700000000000");
    }
}
