//! Notification collaborator (toasts).

use std::sync::{Mutex, PoisonError};

use justicebot_core::{LogLevel, Notification, UploadError};

/// Fire-and-forget sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_destructive() {
            tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            );
        } else {
            tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            );
        }
    }
}

/// Keeps every notification in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain what has been recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub fn len(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Log `err` at the level it declares. `subject` is the file or operation it concerns.
pub fn log_error(err: &UploadError, subject: &str) {
    let recoverable = err.is_recoverable();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(subject, error = %err, error_type = err.title(), recoverable, "Upload error");
        }
        LogLevel::Warn => {
            tracing::warn!(subject, error = %err, error_type = err.title(), recoverable, "Upload error");
        }
        LogLevel::Error => {
            tracing::error!(subject, error = %err, error_type = err.title(), recoverable, "Upload error");
        }
    }
}

/// The toast shown when an upload-level error is reported.
pub fn notification_for(err: &UploadError) -> Notification {
    match err {
        UploadError::NothingToUpload => Notification::info(err.title(), err.to_string()),
        _ => Notification::destructive(err.title(), err.to_string()),
    }
}
