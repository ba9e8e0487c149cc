//! JusticeBot Upload Library
//!
//! The evidence locker's client-side upload pipeline:
//! intake → validate → preview → queue → transport → state.
//!
//! [`UploadQueue`] owns the tracked files and is the only thing that mutates
//! them. Transport, authentication and notifications are collaborators behind
//! the [`Transport`], [`AuthProvider`] and [`Notifier`] traits.

pub mod auth;
pub mod intake;
pub mod notify;
pub mod preview;
pub mod queue;
pub mod transport;

pub use auth::{AuthProvider, SessionAuth};
pub use intake::{FileIntake, IntakeReport, Rejection};
pub use notify::{MemoryNotifier, Notifier, TracingNotifier};
pub use preview::create_image_preview;
pub use queue::{UploadQueue, UploadSummary};
pub use transport::{StorageTransport, Transport};
