pub mod file;
pub mod notification;
pub mod snapshot;
pub mod tracked;

pub use file::{FileHandle, FileId, UploadCategory, UserId};
pub use notification::{Notification, NotificationVariant};
pub use snapshot::{QueueSnapshot, TrackedFileView};
pub use tracked::{FileStatus, TrackedFile, UploadResult};
