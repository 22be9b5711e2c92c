//! Blob store abstraction
//!
//! This module defines the BlobStore trait that all storage backends must implement,
//! together with the age-based retention sweep shared by every backend.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use filestash_core::DeletedFile;
use std::collections::HashMap;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value pairs attached to a blob (metadata or tags).
pub type BlobProperties = HashMap<String, String>;

/// Everything written for one blob.
#[derive(Debug, Clone, Default)]
pub struct BlobPayload {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub metadata: BlobProperties,
    /// Indexable tags, where the backend supports them.
    pub tags: BlobProperties,
}

/// A blob read back from the store.
///
/// Metadata keys may come back lowercased by backends that transport them as
/// HTTP headers.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub metadata: BlobProperties,
}

/// One entry of a blob listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobListing {
    pub name: String,
    /// `None` when the backend could not report a timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Blob store abstraction trait
///
/// All storage backends (object stores, local filesystem) implement this trait so the
/// file repository can work with any of them without coupling to specific details.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Prepare the backend for use: create the container if the backend can,
    /// otherwise verify that it is reachable.
    async fn init(&self) -> StorageResult<()>;

    /// Write a blob under `key`, replacing any existing blob with the same key.
    async fn upload(&self, key: &str, payload: BlobPayload) -> StorageResult<()>;

    /// Read a blob. A missing blob is reported as `StorageError::NotFound`.
    async fn download(&self, key: &str) -> StorageResult<StoredBlob>;

    /// Delete a blob. Deleting a missing blob succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List every blob in the container together with its last-modified time.
    async fn list(&self) -> StorageResult<Vec<BlobListing>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Delete every blob last modified strictly before `cutoff`.
    ///
    /// Blobs without a timestamp are skipped. The returned records are ordered
    /// oldest first. The first failed delete aborts the sweep.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> StorageResult<Vec<DeletedFile>> {
        let listings = self.list().await?;
        let mut deleted = Vec::new();

        for listing in listings {
            let Some(last_modified) = listing.last_modified else {
                tracing::debug!(key = %listing.name, "Skipping blob without last-modified time");
                continue;
            };
            if last_modified >= cutoff {
                continue;
            }

            self.delete(&listing.name).await?;
            tracing::info!(
                key = %listing.name,
                last_modified = %last_modified,
                "Deleted file older than retention threshold"
            );

            deleted.push(DeletedFile {
                name: listing.name,
                deleted_at: last_modified,
            });
        }

        deleted.sort_by_key(|file| file.deleted_at);
        Ok(deleted)
    }
}
