//! File handles and identifiers.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::content_type_for_path;

/// Stable identity of a tracked file inside one queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// `{name}-{last_modified}`. Two copies of the same file share this value;
    /// the queue disambiguates them with [`FileId::with_suffix`].
    pub fn derive(name: &str, last_modified: i64) -> Self {
        FileId(format!("{}-{}", name, last_modified))
    }

    pub fn with_suffix(&self, n: usize) -> Self {
        FileId(format!("{}~{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        FileId(value.to_string())
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        FileId(value)
    }
}

/// Identifier of the signed-in user, used to namespace storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level storage folder an upload lands in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadCategory {
    #[default]
    Evidence,
    Documents,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Evidence => "evidence",
            UploadCategory::Documents => "documents",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "evidence" => Ok(UploadCategory::Evidence),
            "documents" => Ok(UploadCategory::Documents),
            _ => Err(anyhow::anyhow!("Invalid upload category: {}", s)),
        }
    }
}

#[derive(Clone)]
enum FileSource {
    Memory(Bytes),
    Disk(PathBuf),
}

/// A user-selected file: name, size and type attributes plus a lazily read payload.
///
/// Cloning is cheap; the payload itself is shared or re-read on demand.
#[derive(Clone)]
pub struct FileHandle {
    name: String,
    size: u64,
    content_type: String,
    last_modified: i64,
    source: FileSource,
}

impl FileHandle {
    /// Build a handle over bytes already in memory (drag-drop, remote picker).
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        last_modified: i64,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            last_modified,
            source: FileSource::Memory(data),
        }
    }

    /// Build a handle over a file on disk. Size and modification time come from
    /// the file's metadata; the content type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let last_modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or_default();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            content_type: content_type_for_path(path).to_string(),
            last_modified,
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Milliseconds since the Unix epoch.
    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    pub fn is_image(&self) -> bool {
        self.content_type.to_lowercase().starts_with("image/")
    }

    /// Read the full payload.
    pub async fn read(&self) -> io::Result<Bytes> {
        match &self.source {
            FileSource::Memory(data) => Ok(data.clone()),
            FileSource::Disk(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}
