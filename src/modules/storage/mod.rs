//! Storage module for report photos
//!
//! Defines the [`BlobStore`] seam used by the ingestion pipeline and a
//! local-filesystem implementation whose files are served statically.

mod local_storage;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use local_storage::LocalBlobStore;

/// A photo that has been written to durable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public reference, e.g. `/uploads/<uuid>.jpg`
    pub reference: String,
    /// Generated file name (`<uuid>.<ext>`)
    pub file_name: String,
    /// Where the bytes live on disk
    pub path: PathBuf,
}

/// Durable storage for uploaded photos
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under a freshly generated name.
    ///
    /// Only the extension of `name_hint` is used. Fails with
    /// [`AppError::Storage`] and leaves no partial object behind.
    async fn store(&self, name_hint: &str, data: &[u8]) -> Result<StoredImage, AppError>;
}
