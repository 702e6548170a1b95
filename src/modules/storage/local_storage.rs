use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BlobStore, StoredImage};
use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Extension used when the uploaded filename has none we can trust
const FALLBACK_EXTENSION: &str = "bin";

const MAX_EXTENSION_LEN: usize = 10;

/// Stores photos as flat files in a single upload directory
pub struct LocalBlobStore {
    root: PathBuf,
    public_path: String,
}

impl LocalBlobStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            root: config.upload_dir,
            public_path: config.public_path,
        }
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_root_exists(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    /// Extension taken from the caller's filename, lower-cased.
    ///
    /// Anything that is not a short ASCII alphanumeric run falls back to `bin`.
    pub fn extension_from_hint(name_hint: &str) -> String {
        Path::new(name_hint)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }

    /// `<uuid v4>.<ext>`
    fn generate_file_name(name_hint: &str) -> String {
        format!("{}.{}", Uuid::new_v4(), Self::extension_from_hint(name_hint))
    }

    fn reference_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_path, file_name)
    }
}

/// Removes a freshly created upload unless it is kept.
///
/// Covers write errors and a `store` future dropped mid-write.
struct PartialUpload {
    path: PathBuf,
    kept: bool,
}

impl PartialUpload {
    fn new(path: PathBuf) -> Self {
        Self { path, kept: false }
    }

    fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for PartialUpload {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial upload {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove partial upload '{}': {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Sink that can be flushed to stable storage
#[async_trait]
trait DurableWrite: AsyncWrite + Unpin + Send {
    async fn sync(&mut self) -> io::Result<()>;
}

#[async_trait]
impl DurableWrite for File {
    async fn sync(&mut self) -> io::Result<()> {
        self.sync_all().await
    }
}

/// Write `data` through `writer` into the new file at `path`.
///
/// `path` is removed unless every byte was written and synced.
async fn write_upload<W: DurableWrite>(
    path: &Path,
    mut writer: W,
    data: &[u8],
) -> Result<(), AppError> {
    let partial = PartialUpload::new(path.to_path_buf());

    let written = async {
        writer.write_all(data).await?;
        writer.flush().await?;
        writer.sync().await
    }
    .await;

    drop(writer);
    written.map_err(|e| {
        AppError::Storage(format!("Failed to write file '{}': {}", path.display(), e))
    })?;

    partial.keep();
    Ok(())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, name_hint: &str, data: &[u8]) -> Result<StoredImage, AppError> {
        let file_name = Self::generate_file_name(name_hint);
        let path = self.root.join(&file_name);

        // create_new: never clobber an existing object
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to create file '{}': {}", path.display(), e))
            })?;

        write_upload(&path, file, data).await?;

        debug!("Stored {} bytes at {}", data.len(), path.display());

        Ok(StoredImage {
            reference: self.reference_for(&file_name),
            file_name,
            path,
        })
    }
}
