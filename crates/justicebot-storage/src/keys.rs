//! Shared key generation for storage backends.
//!
//! Key format: `{category}/{user_id}/{timestamp_ms}-{file_name}`.

use justicebot_core::{UploadCategory, UserId};

use crate::traits::{StorageError, StorageResult};

const MAX_SEGMENT_LENGTH: usize = 255;

/// Generate the storage key for one upload attempt.
///
/// The timestamp makes every attempt a distinct object, so a retried upload
/// never overwrites or resumes an earlier one.
pub fn generate_upload_key(
    category: UploadCategory,
    user_id: &UserId,
    timestamp_ms: i64,
    file_name: &str,
) -> String {
    format!(
        "{}/{}/{}-{}",
        category.as_str(),
        sanitize_segment(user_id.as_str()),
        timestamp_ms,
        sanitize_segment(file_name)
    )
}

/// Reduce one key segment to `[A-Za-z0-9._-]`, dropping any path components.
pub fn sanitize_segment(segment: &str) -> String {
    let name_only = segment.rsplit(['/', '\\']).next().unwrap_or(segment);

    let sanitized: String = name_only
        .chars()
        .take(MAX_SEGMENT_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ".." must not survive as a key segment
    let sanitized = sanitized.replace("..", "_");

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        return "file".to_string();
    }

    sanitized
}

/// Reject keys that could escape the bucket or storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
