//! evidence-locker: queue evidence files from disk and upload them.
//!
//! Storage is chosen with STORAGE_BACKEND (s3 or local), or S3 when S3_BUCKET
//! is set, or local otherwise; see the matching S3_* or LOCAL_STORAGE_*
//! variables. Limits come from MAX_FILE_SIZE_MB and
//! ALLOWED_CONTENT_TYPES.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use justicebot_cli::{init_tracing, load_files, print_json, validate_paths};
use justicebot_core::{StorageConfig, UploadCategory, UploadConfig, UploadError, UserId};
use justicebot_storage::create_storage;
use justicebot_upload::{SessionAuth, StorageTransport, TracingNotifier, UploadQueue};

#[derive(Parser)]
#[command(name = "evidence-locker", about = "Upload case evidence")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and upload files, then print the queue state
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Id of the user the files belong to
        #[arg(long, env = "JUSTICEBOT_USER_ID")]
        user: String,
        /// Storage category: evidence or documents
        #[arg(long)]
        category: Option<String>,
        /// Extra passes over failed files
        #[arg(long, default_value = "0")]
        retry: u32,
    },
    /// Check files against the intake rules without uploading
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = UploadConfig::from_env().context("Failed to load upload configuration")?;
    config.validate()?;

    match cli.command {
        Commands::Upload {
            files,
            user,
            category,
            retry,
        } => {
            if let Some(category) = category {
                config.category = category.parse::<UploadCategory>()?;
            }
            upload(files, UserId::new(user), config, retry).await?;
        }
        Commands::Validate { files } => {
            let lines = validate_paths(&files, &config).await?;
            print_json(&lines)?;
        }
    }

    Ok(())
}

async fn upload(
    paths: Vec<PathBuf>,
    user: UserId,
    config: UploadConfig,
    retries: u32,
) -> anyhow::Result<()> {
    let storage_config = StorageConfig::from_env().context("Failed to load storage configuration")?;
    let storage = create_storage(&storage_config)
        .await
        .context("Failed to initialize storage")?;

    let queue = UploadQueue::new(
        config,
        Arc::new(StorageTransport::new(storage)),
        Arc::new(SessionAuth::signed_in(user)),
        Arc::new(TracingNotifier),
    );

    let mut updates = queue.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            for file in snapshot.files.iter().filter(|f| f.status == "uploading") {
                tracing::debug!(file_id = %file.id, progress = file.progress, "Uploading");
            }
        }
    });

    queue.add_files(load_files(&paths).await?).await;

    let mut outcome = queue.upload_files().await;
    for attempt in 1..=retries {
        if !queue.has_failed_files() {
            break;
        }
        tracing::info!(attempt, "Retrying failed uploads");
        outcome = queue.retry_failed_uploads().await;
    }

    progress.abort();

    match outcome {
        Ok(_) | Err(UploadError::NothingToUpload) => {}
        Err(e) => return Err(e.into()),
    }

    let snapshot = queue.snapshot();
    tracing::info!(
        files_secured = snapshot.uploaded_count(),
        images_secured = snapshot.uploaded_image_count(),
        failed = snapshot.failed_count(),
        "Evidence summary"
    );
    print_json(&snapshot)?;

    if snapshot.has_failed_files {
        anyhow::bail!("{} file(s) failed to upload", snapshot.failed_count());
    }
    Ok(())
}
