use std::path::{Path, PathBuf};

use anyhow::Context;
use justicebot_core::validation::validate_file;
use justicebot_core::{FileHandle, UploadConfig};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Open every path as a file handle, failing on the first unreadable one.
pub async fn load_files(paths: &[PathBuf]) -> anyhow::Result<Vec<FileHandle>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = FileHandle::from_path(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationLine {
    pub path: String,
    pub content_type: String,
    pub size: u64,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the intake rules over files on disk without queueing anything.
pub async fn validate_paths(
    paths: &[PathBuf],
    config: &UploadConfig,
) -> anyhow::Result<Vec<ValidationLine>> {
    let files = load_files(paths).await?;
    Ok(paths
        .iter()
        .zip(files)
        .map(|(path, file)| validation_line(path, &file, config))
        .collect())
}

fn validation_line(path: &Path, file: &FileHandle, config: &UploadConfig) -> ValidationLine {
    let error = validate_file(file, config).err().map(|e| e.to_string());
    ValidationLine {
        path: path.display().to_string(),
        content_type: file.content_type().to_string(),
        size: file.size(),
        accepted: error.is_none(),
        error,
    }
}
