//! Image previews as `data:` URLs.

use base64::Engine;
use justicebot_core::validation::normalize_mime_type;
use justicebot_core::{FileHandle, PreviewError};

/// Read the whole file and encode it as `data:{type};base64,{payload}`.
pub async fn create_image_preview(file: &FileHandle) -> Result<String, PreviewError> {
    if !file.is_image() {
        return Err(PreviewError::NotAnImage(file.name().to_string()));
    }

    let data = file.read().await.map_err(|source| PreviewError::Read {
        file_name: file.name().to_string(),
        source,
    })?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&data);
    Ok(format!(
        "data:{};base64,{}",
        normalize_mime_type(file.content_type()),
        encoded
    ))
}
