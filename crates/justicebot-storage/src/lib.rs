//! JusticeBot Storage Library
//!
//! Object-store abstraction for uploaded evidence, with S3 and local
//! filesystem backends.
//!
//! # Storage key format
//!
//! Keys are user-scoped: `{category}/{user_id}/{timestamp_ms}-{file_name}`.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, normalize_base_url, resolve_backend};
pub use justicebot_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
