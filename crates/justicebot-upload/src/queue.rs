//! Upload queue manager
//!
//! Owns the tracked files and drives their uploads. Every mutation is a short
//! critical section under one mutex and publishes a fresh [`QueueSnapshot`],
//! so concurrent completions, removals and clears are serialized without any
//! lock being held across an `.await`.
//!
//! Progress shown while a transfer is pending is synthetic: it advances on a
//! timer, stops below 100, and says nothing about bytes actually sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use justicebot_core::{
    FileHandle, FileId, Notification, QueueSnapshot, TrackedFile, UploadConfig, UploadError,
    UploadResult, UserId,
};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::auth::AuthProvider;
use crate::intake::FileIntake;
use crate::notify::{log_error, notification_for, Notifier};
use crate::transport::Transport;

/// What one `upload_files` batch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: Vec<FileId>,
    pub failed: Vec<(FileId, String)>,
    /// Files removed from the queue while their transfer was in flight
    pub discarded: Vec<FileId>,
}

impl UploadSummary {
    pub fn succeeded_count(&self) -> usize {
        self.uploaded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    fn notification(&self) -> Notification {
        let succeeded = self.succeeded_count();
        let failed = self.failed_count();

        if succeeded == 0 && failed > 0 {
            return Notification::destructive(
                "Upload Failed",
                format!("{} file(s) failed to upload.", failed),
            );
        }

        let mut description = format!("{} file(s) uploaded successfully.", succeeded);
        if failed > 0 {
            description.push_str(&format!(" {} failed.", failed));
        }
        Notification::info("Upload Complete", description)
    }
}

enum Settled {
    Uploaded,
    Failed(String),
    Discarded,
}

#[derive(Default)]
struct QueueState {
    files: Vec<TrackedFile>,
    /// Claimed attempt per uploading file; a transfer only writes back while its claim holds
    in_flight: HashMap<FileId, u64>,
    next_attempt: u64,
    active_batches: usize,
}

impl QueueState {
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot::new(&self.files, self.active_batches > 0)
    }

    fn unique_id(&self, base: &FileId) -> FileId {
        let taken = |id: &FileId| self.files.iter().any(|f| &f.id == id);
        if !taken(base) {
            return base.clone();
        }
        (2..)
            .map(|n| base.with_suffix(n))
            .find(|id| !taken(id))
            .unwrap_or_else(|| base.clone())
    }

    fn claimed_mut(&mut self, id: &FileId, attempt: u64) -> Option<&mut TrackedFile> {
        if self.in_flight.get(id) != Some(&attempt) {
            return None;
        }
        self.files.iter_mut().find(|f| &f.id == id)
    }
}

/// Undoes a batch's bookkeeping when `upload_files` finishes or is dropped.
///
/// Claims still held at that point belong to transfers that never settled;
/// their files go back to `Pending` so a later call can pick them up.
struct BatchGuard<'a> {
    queue: &'a UploadQueue,
    claims: Vec<(FileId, u64)>,
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        let claims = &self.claims;
        let released = self.queue.update(|state| {
            state.active_batches = state.active_batches.saturating_sub(1);
            let mut released = 0;
            for (id, attempt) in claims {
                match state.claimed_mut(id, *attempt) {
                    Some(file) => {
                        file.cancel_upload();
                    }
                    None => continue,
                }
                state.in_flight.remove(id);
                released += 1;
            }
            released
        });

        if released > 0 {
            tracing::warn!(files = released, "Upload batch dropped before settling");
        }
    }
}

struct Inner {
    config: UploadConfig,
    intake: FileIntake,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<QueueState>,
    snapshots: watch::Sender<QueueSnapshot>,
}

/// Cloneable handle to one upload queue. Clones share the same files.
#[derive(Clone)]
pub struct UploadQueue {
    inner: Arc<Inner>,
}

impl UploadQueue {
    pub fn new(
        config: UploadConfig,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (snapshots, _) = watch::channel(QueueSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                intake: FileIntake::new(config.clone()),
                config,
                transport,
                auth,
                notifier,
                state: Mutex::new(QueueState::default()),
                snapshots,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` and publish the resulting snapshot before releasing the lock.
    fn update<R>(&self, f: impl FnOnce(&mut QueueState) -> R) -> R {
        let mut state = self.state();
        let out = f(&mut state);
        let snapshot = state.snapshot();
        self.inner.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
        out
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.state().snapshot()
    }

    /// Receive a new snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn get(&self, id: &FileId) -> Option<TrackedFile> {
        self.state().files.iter().find(|f| &f.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_files(&self) -> bool {
        !self.is_empty()
    }

    pub fn has_uploaded_files(&self) -> bool {
        self.state().files.iter().any(TrackedFile::uploaded)
    }

    pub fn has_failed_files(&self) -> bool {
        self.state().files.iter().any(|f| f.error().is_some())
    }

    pub fn is_uploading(&self) -> bool {
        self.state().active_batches > 0
    }

    /// Validate `files` and append the accepted ones as pending entries.
    ///
    /// Each rejected file produces one "Invalid File" notification. Returns the
    /// ids of the accepted files in arrival order.
    pub async fn add_files(&self, files: Vec<FileHandle>) -> Vec<FileId> {
        let report = self.inner.intake.process(files).await;

        for rejection in &report.rejected {
            self.notify(rejection.notification());
        }

        let ids = self.update(|state| {
            let mut ids = Vec::with_capacity(report.accepted.len());
            for mut file in report.accepted {
                file.id = state.unique_id(&file.id);
                ids.push(file.id.clone());
                state.files.push(file);
            }
            ids
        });

        tracing::debug!(
            accepted = ids.len(),
            rejected = report.rejected.len(),
            "Added files to upload queue"
        );

        ids
    }

    /// Drop an entry, whatever its state. An in-flight transfer is not
    /// cancelled; its result is discarded when it settles.
    pub fn remove_file(&self, id: &FileId) -> bool {
        self.update(|state| {
            state.in_flight.remove(id);
            let before = state.files.len();
            state.files.retain(|f| &f.id != id);
            state.files.len() != before
        })
    }

    /// Drop every entry, including those mid-upload.
    pub fn clear_files(&self) {
        self.update(|state| {
            state.files.clear();
            state.in_flight.clear();
        });
    }

    /// Upload every pending file concurrently and wait for all of them to settle.
    ///
    /// One file's failure never affects another's. Errors are reported to the
    /// notifier before they are returned; the only errors are
    /// [`UploadError::NothingToUpload`] and [`UploadError::AuthenticationRequired`],
    /// and in both cases no file is touched.
    ///
    /// Dropping the returned future abandons the transfers still running and
    /// puts their files back to pending; no aggregate notification is sent.
    pub async fn upload_files(&self) -> Result<UploadSummary, UploadError> {
        let user = self.inner.auth.current_user();

        let claimed = self.update(|state| {
            if !state.files.iter().any(TrackedFile::is_pending) {
                return Err(UploadError::NothingToUpload);
            }
            let Some(user) = user else {
                return Err(UploadError::AuthenticationRequired);
            };

            let mut batch = Vec::new();
            for file in state.files.iter_mut() {
                if file.start_upload() {
                    let attempt = state.next_attempt;
                    state.next_attempt += 1;
                    state.in_flight.insert(file.id.clone(), attempt);
                    batch.push((file.id.clone(), file.file.clone(), attempt));
                }
            }
            state.active_batches += 1;
            Ok((user, batch))
        });

        let (user, batch) = match claimed {
            Ok(claimed) => claimed,
            Err(err) => {
                log_error(&err, "upload_files");
                self.notify(notification_for(&err));
                return Err(err);
            }
        };

        tracing::info!(files = batch.len(), user_id = %user, "Starting upload batch");

        let guard = BatchGuard {
            queue: self,
            claims: batch
                .iter()
                .map(|(id, _, attempt)| (id.clone(), *attempt))
                .collect(),
        };

        let uploads = batch
            .into_iter()
            .map(|(id, file, attempt)| self.upload_one(id, file, attempt, &user));
        let settled = join_all(uploads).await;

        let mut summary = UploadSummary::default();
        for (id, outcome) in settled {
            match outcome {
                Settled::Uploaded => summary.uploaded.push(id),
                Settled::Failed(message) => summary.failed.push((id, message)),
                Settled::Discarded => summary.discarded.push(id),
            }
        }

        tracing::info!(
            uploaded = summary.succeeded_count(),
            failed = summary.failed_count(),
            discarded = summary.discarded.len(),
            "Upload batch settled"
        );

        self.notify(summary.notification());
        drop(guard);

        Ok(summary)
    }

    /// Return failed files to pending, then run [`UploadQueue::upload_files`].
    /// Uploaded files are left exactly as they are.
    pub async fn retry_failed_uploads(&self) -> Result<UploadSummary, UploadError> {
        let reset = self.update(|state| {
            state
                .files
                .iter_mut()
                .map(TrackedFile::reset_for_retry)
                .filter(|reset| *reset)
                .count()
        });

        tracing::info!(files = reset, "Retrying failed uploads");

        self.upload_files().await
    }

    async fn upload_one(
        &self,
        id: FileId,
        file: FileHandle,
        attempt: u64,
        user: &UserId,
    ) -> (FileId, Settled) {
        let config = &self.inner.config;
        let mut ticker = interval_at(Instant::now() + config.progress_tick, config.progress_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let transfer = self.inner.transport.upload(&file, user, config.category);
        tokio::pin!(transfer);

        let result = loop {
            tokio::select! {
                result = &mut transfer => break result,
                _ = ticker.tick() => self.tick_progress(&id, attempt),
            }
        };
        // The ticker stops here, so no tick can land after the terminal state.
        drop(ticker);

        let settled = match result {
            Ok(result) => self.settle_success(&id, attempt, result),
            Err(e) => {
                let err = UploadError::from(e);
                log_error(&err, id.as_str());
                self.settle_failure(&id, attempt, err.to_string())
            }
        };

        (id, settled)
    }

    fn tick_progress(&self, id: &FileId, attempt: u64) {
        let (step, cap) = (self.inner.config.progress_step, self.inner.config.progress_cap);
        self.update(|state| {
            if let Some(file) = state.claimed_mut(id, attempt) {
                file.advance_progress(step, cap);
            }
        });
    }

    fn settle_success(&self, id: &FileId, attempt: u64, result: UploadResult) -> Settled {
        self.update(|state| {
            let Some(file) = state.claimed_mut(id, attempt) else {
                tracing::debug!(file_id = %id, "Discarding result for removed file");
                return Settled::Discarded;
            };
            file.complete(result);
            state.in_flight.remove(id);
            Settled::Uploaded
        })
    }

    fn settle_failure(&self, id: &FileId, attempt: u64, message: String) -> Settled {
        self.update(|state| {
            let Some(file) = state.claimed_mut(id, attempt) else {
                return Settled::Discarded;
            };
            file.fail(message.clone());
            state.in_flight.remove(id);
            Settled::Failed(message)
        })
    }
}
