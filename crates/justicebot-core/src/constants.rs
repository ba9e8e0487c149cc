//! Shared constants for the upload pipeline.

/// Default maximum size of a single evidence file (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Content types accepted by the evidence locker.
///
/// `image/jpg` is not a registered type but some browsers and pickers send it.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Interval between synthetic progress ticks.
pub const DEFAULT_PROGRESS_TICK_MS: u64 = 200;

/// Percentage added on each synthetic progress tick.
pub const DEFAULT_PROGRESS_STEP: u8 = 10;

/// Synthetic progress never passes this value; only a completed transfer reaches 100.
pub const DEFAULT_PROGRESS_CAP: u8 = 90;

/// Fallback content type when none is known.
pub const OCTET_STREAM: &str = "application/octet-stream";
