//! File repository
//!
//! Thin layer over the durable blob store: translates files to blobs and back,
//! classifies failures by operation and logs every outcome.

use crate::metadata;
use chrono::{Duration, Utc};
use filestash_core::{AppError, DeletedFile, File, FileId, StorageBackend};
use filestash_storage::{BlobStore, StorageError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Number of blob deletes issued concurrently by `delete_files`.
const DELETE_CONCURRENCY: usize = 16;

#[derive(Clone)]
pub struct FileRepository {
    store: Arc<dyn BlobStore>,
}

impl FileRepository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn backend_type(&self) -> StorageBackend {
        self.store.backend_type()
    }

    /// Write a file to the durable store, overwriting any file with the same id.
    #[tracing::instrument(skip(self, file), fields(file.id = %id, file.size = file.size()))]
    pub async fn put_file(&self, id: FileId, file: File) -> Result<(), AppError> {
        let payload = metadata::to_payload(file);

        match self.store.upload(&id.to_string(), payload).await {
            Ok(()) => {
                tracing::info!(file_id = %id, "Successfully uploaded file to file storage");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, file_id = %id, "Could not upload file");
                Err(AppError::StorageWrite(format!("file {}: {}", id, e)))
            }
        }
    }

    /// Read a file from the durable store. A missing file is `Ok(None)`.
    #[tracing::instrument(skip(self), fields(file.id = %id))]
    pub async fn find_file(&self, id: FileId) -> Result<Option<File>, AppError> {
        match self.store.download(&id.to_string()).await {
            Ok(blob) => {
                tracing::info!(file_id = %id, "Successfully downloaded file from file storage");
                Ok(Some(metadata::from_stored(blob)))
            }
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(file_id = %id, "Could not find file");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, file_id = %id, "Could not download file");
                Err(AppError::StorageRead(format!("file {}: {}", id, e)))
            }
        }
    }

    /// Delete files from the durable store. Missing files count as deleted.
    ///
    /// Every id is attempted; if any delete fails the call fails after the rest finish.
    #[tracing::instrument(skip(self, ids), fields(file.count = ids.len()))]
    pub async fn delete_files(&self, ids: &[FileId]) -> Result<(), AppError> {
        let results: Vec<(FileId, Result<(), StorageError>)> = stream::iter(ids.iter().copied())
            .map(|id| {
                let store = self.store.clone();
                async move { (id, store.delete(&id.to_string()).await) }
            })
            .buffer_unordered(DELETE_CONCURRENCY)
            .collect()
            .await;

        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => tracing::info!(file_id = %id, "Successfully deleted file from file storage"),
                Err(e) => {
                    tracing::error!(error = %e, file_id = %id, "Could not delete file");
                    failed.push(id.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(AppError::StorageDelete(format!(
                "{} of {} files could not be deleted: {}",
                failed.len(),
                ids.len(),
                failed.join(", ")
            )))
        }
    }

    /// Delete every file last modified more than `days` days ago.
    #[tracing::instrument(skip(self))]
    pub async fn delete_files_older_than(&self, days: i64) -> Result<Vec<DeletedFile>, AppError> {
        let cutoff = Duration::try_days(days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                AppError::InvalidArgument(format!("retention of {} days is out of range", days))
            })?;

        let deleted = self.store.delete_older_than(cutoff).await.map_err(|e| {
            tracing::error!(error = %e, days, "Could not delete old files");
            AppError::StorageDelete(format!("could not delete old files: {}", e))
        })?;

        for file in &deleted {
            tracing::info!(name = %file.name, timestamp = %file.deleted_at, "Deleted file");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_file, FakeBlobStore};
    use std::sync::atomic::Ordering;
    use uuid::Uuid;

    fn repository() -> (Arc<FakeBlobStore>, FileRepository) {
        let store = Arc::new(FakeBlobStore::default());
        (store.clone(), FileRepository::new(store))
    }

    #[tokio::test]
    async fn test_put_then_find() {
        let (_, repository) = repository();
        let id = Uuid::new_v4();

        repository.put_file(id, sample_file("a.txt")).await.unwrap();

        let found = repository.find_file(id).await.unwrap();
        assert_eq!(found, Some(sample_file("a.txt")));
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let (_, repository) = repository();

        assert_eq!(repository.find_file(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failures_are_classified_by_operation() {
        let (store, repository) = repository();
        store.fail_uploads.store(true, Ordering::SeqCst);
        store.fail_downloads.store(true, Ordering::SeqCst);
        store.fail_deletes.store(true, Ordering::SeqCst);
        let id = Uuid::new_v4();

        assert!(matches!(
            repository.put_file(id, sample_file("a")).await,
            Err(AppError::StorageWrite(_))
        ));
        assert!(matches!(
            repository.find_file(id).await,
            Err(AppError::StorageRead(_))
        ));
        assert!(matches!(
            repository.delete_files(&[id]).await,
            Err(AppError::StorageDelete(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_files_attempts_every_id() {
        let (store, repository) = repository();
        let ids: Vec<_> = (0..40).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            repository.put_file(*id, sample_file("x")).await.unwrap();
        }

        repository.delete_files(&ids).await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 40);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_files_succeeds() {
        let (_, repository) = repository();

        assert!(repository.delete_files(&[Uuid::new_v4()]).await.is_ok());
    }

    #[tokio::test]
    async fn test_out_of_range_retention_is_invalid_argument() {
        let (store, repository) = repository();
        store.insert_aged("old", metadata::to_payload(sample_file("old")), 200);

        for days in [100_000_000, i64::MAX] {
            let result = repository.delete_files_older_than(days).await;
            assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        }
        assert_eq!(store.listings.load(Ordering::SeqCst), 0);
        assert!(store.contains("old"));
    }

    #[tokio::test]
    async fn test_delete_files_older_than() {
        let (store, repository) = repository();
        for (key, age) in [("old", 200), ("mid", 100), ("new", 10)] {
            store.insert_aged(key, metadata::to_payload(sample_file(key)), age);
        }

        let deleted = repository.delete_files_older_than(180).await.unwrap();

        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].name, "old");
        assert!(store.contains("mid"));
        assert!(store.contains("new"));
    }

    #[tokio::test]
    async fn test_sweep_failure_is_a_delete_error() {
        let (store, repository) = repository();
        store.fail_listing.store(true, Ordering::SeqCst);

        assert!(matches!(
            repository.delete_files_older_than(180).await,
            Err(AppError::StorageDelete(_))
        ));
    }
}
