//! Shared fixtures for upload queue integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use justicebot_core::{
    FileHandle, StorageBackend, TransportError, UploadCategory, UploadConfig, UploadResult,
    UserId,
};
use justicebot_storage::{Storage, StorageError, StorageResult};
use justicebot_upload::{MemoryNotifier, SessionAuth, Transport, UploadQueue};
use tokio::sync::Notify;

pub const MB: usize = 1024 * 1024;

/// How the mock transport answers for one file name.
#[derive(Clone)]
pub struct Plan {
    pub delay: Duration,
    pub error: Option<String>,
    /// Hold the call until notified
    pub gate: Option<Arc<Notify>>,
}

impl Plan {
    pub fn succeed() -> Self {
        Self {
            delay: Duration::ZERO,
            error: None,
            gate: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::succeed()
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Transport double keyed by file name. Unknown names succeed immediately.
#[derive(Default)]
pub struct MockTransport {
    plans: Mutex<HashMap<String, Plan>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self, file_name: &str, plan: Plan) {
        self.plans
            .lock()
            .unwrap()
            .insert(file_name.to_string(), plan);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, file_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|name| name.as_str() == file_name)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn upload(
        &self,
        file: &FileHandle,
        user_id: &UserId,
        category: UploadCategory,
    ) -> Result<UploadResult, TransportError> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(file.name().to_string());
            calls.len()
        };
        let plan = self
            .plans
            .lock()
            .unwrap()
            .get(file.name())
            .cloned()
            .unwrap_or_else(Plan::succeed);

        if let Some(gate) = plan.gate {
            gate.notified().await;
        }
        if !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }
        if let Some(message) = plan.error {
            return Err(TransportError::Storage(message));
        }

        let storage_key = format!("{}/{}/{}-{}", category, user_id, call_number, file.name());
        Ok(UploadResult {
            url: format!("https://storage.test/{}", storage_key),
            file_name: file.name().to_string(),
            size: file.size(),
            content_type: file.content_type().to_string(),
            storage_key,
        })
    }
}

/// In-memory object store. Keys containing `reject` fail to upload.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        if storage_key.contains("reject") {
            return Err(StorageError::UploadFailed("bucket refused write".to_string()));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            (data, content_type.to_string()),
        );
        Ok(format!("memory://{}", storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub struct TestQueue {
    pub queue: UploadQueue,
    pub transport: Arc<MockTransport>,
    pub notifier: Arc<MemoryNotifier>,
    pub auth: Arc<SessionAuth>,
}

pub fn setup_queue() -> TestQueue {
    setup_queue_with(UploadConfig {
        progress_tick: Duration::from_millis(10),
        ..UploadConfig::default()
    })
}

pub fn setup_queue_with(config: UploadConfig) -> TestQueue {
    let transport = Arc::new(MockTransport::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let auth = Arc::new(SessionAuth::signed_in(UserId::new("user-1")));
    let queue = UploadQueue::new(config, transport.clone(), auth.clone(), notifier.clone());
    TestQueue {
        queue,
        transport,
        notifier,
        auth,
    }
}

pub fn pdf(name: &str, size: usize) -> FileHandle {
    FileHandle::from_bytes(name, "application/pdf", 1_700_000_000_000, vec![0u8; size])
}

pub fn png(name: &str, size: usize) -> FileHandle {
    FileHandle::from_bytes(name, "image/png", 1_700_000_000_001, vec![0u8; size])
}

pub fn text(name: &str) -> FileHandle {
    FileHandle::from_bytes(name, "text/plain", 1_700_000_000_002, b"statement".to_vec())
}

/// Poll `condition` until it holds, panicking after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 2s"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
