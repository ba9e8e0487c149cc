//! Intake rules for evidence files.

use std::path::Path;

use crate::config::UploadConfig;
use crate::constants::OCTET_STREAM;
use crate::error::ValidationError;
use crate::models::FileHandle;

/// Normalize MIME type by stripping parameters (e.g. "text/plain; charset=utf-8" -> "text/plain").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

pub fn validate_file_size(size: u64, config: &UploadConfig) -> Result<(), ValidationError> {
    if size > config.max_file_size_bytes {
        return Err(ValidationError::FileTooLarge {
            size,
            max_mb: config.max_file_size_mb(),
        });
    }
    Ok(())
}

/// Compares the normalized MIME type only, so parameters cannot bypass the allowlist.
pub fn validate_content_type(
    content_type: &str,
    config: &UploadConfig,
) -> Result<(), ValidationError> {
    let normalized = normalize_mime_type(content_type);
    if !config
        .allowed_content_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&normalized))
    {
        return Err(ValidationError::UnsupportedType(content_type.to_string()));
    }
    Ok(())
}

/// Size is checked before type, so an oversized file of a bad type reports its size.
pub fn validate_file(file: &FileHandle, config: &UploadConfig) -> Result<(), ValidationError> {
    validate_file_size(file.size(), config)?;
    validate_content_type(file.content_type(), config)
}

pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map(content_type_for_extension)
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> FileHandle {
        FileHandle::from_bytes(name, content_type, 0, vec![0u8; size])
    }

    #[test]
    fn accepts_every_default_type() {
        let config = UploadConfig::default();
        for content_type in &config.allowed_content_types {
            assert!(validate_file(&file("f", content_type, 10), &config).is_ok());
        }
    }

    #[test]
    fn rejects_oversized_files() {
        let config = UploadConfig::default();
        let result = validate_file(&file("big.pdf", "application/pdf", 10 * 1024 * 1024 + 1), &config);
        assert!(matches!(result, Err(ValidationError::FileTooLarge { max_mb: 10, .. })));

        // exactly at the limit is fine
        let result = validate_file(&file("ok.pdf", "application/pdf", 10 * 1024 * 1024), &config);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_disallowed_types() {
        let config = UploadConfig::default();
        for content_type in ["application/zip", "image/gif", "video/mp4", ""] {
            let result = validate_file(&file("f", content_type, 10), &config);
            assert!(matches!(result, Err(ValidationError::UnsupportedType(_))));
        }
    }

    #[test]
    fn mime_parameters_and_case_are_ignored() {
        let config = UploadConfig::default();
        assert!(validate_content_type("Text/Plain; charset=utf-8", &config).is_ok());
        assert_eq!(normalize_mime_type("IMAGE/PNG ; q=1"), "image/png");
    }

    #[test]
    fn extension_table() {
        assert_eq!(content_type_for_path(Path::new("a/b/scan.JPG")), "image/jpeg");
        assert_eq!(
            content_type_for_path(Path::new("brief.docx")),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(content_type_for_path(Path::new("README")), OCTET_STREAM);
    }
}
