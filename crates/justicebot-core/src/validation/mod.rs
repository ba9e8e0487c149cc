//! Validation modules

pub mod file;

pub use file::{
    content_type_for_extension, content_type_for_path, normalize_mime_type, validate_content_type,
    validate_file, validate_file_size,
};
