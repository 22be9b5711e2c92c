//! File service
//!
//! Orchestrates the cache and the repository. Writes go to the cache first and
//! are rolled back from it when the durable write fails, so a file that is
//! not durably stored is never served from the cache. Reads hit the cache
//! first and fall back to the durable store without warming the cache.

use crate::cache::FileCache;
use crate::repository::FileRepository;
use filestash_core::{AppError, DeletedFile, File, FileId};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct FileService {
    cache: Arc<dyn FileCache>,
    repository: FileRepository,
}

impl FileService {
    pub fn new(cache: Arc<dyn FileCache>, repository: FileRepository) -> Self {
        Self { cache, repository }
    }

    pub fn repository(&self) -> &FileRepository {
        &self.repository
    }

    /// Look a file up by id. `Ok(None)` means it exists in neither tier.
    #[tracing::instrument(skip(self), fields(file.id = %id))]
    pub async fn find(&self, id: FileId) -> Result<Option<File>, AppError> {
        if let Some(file) = self.cache.get(&id)? {
            tracing::debug!(file_id = %id, "File served from cache");
            return Ok(Some(file));
        }

        self.repository.find_file(id).await
    }

    /// Store a new file under a freshly generated id and return the id.
    pub async fn create(&self, file: File) -> Result<FileId, AppError> {
        let id = Uuid::new_v4();
        self.put(id, file).await?;
        Ok(id)
    }

    /// Store a file in the cache and then in the durable store.
    ///
    /// The nil id and files failing validation are rejected before either tier is
    /// touched. If the durable write fails the cache entry is removed again and the
    /// durable error is returned.
    #[tracing::instrument(skip(self, file), fields(file.id = %id))]
    pub async fn put(&self, id: FileId, file: File) -> Result<(), AppError> {
        if id.is_nil() {
            return Err(AppError::InvalidArgument("File id is required".to_string()));
        }
        file.validate()?;

        self.cache.put(id, file.clone())?;

        if let Err(e) = self.repository.put_file(id, file).await {
            if let Err(cache_err) = self.cache.remove(&id) {
                tracing::error!(
                    error = %cache_err,
                    file_id = %id,
                    "Could not roll back cache entry after failed upload"
                );
            }
            return Err(e);
        }

        Ok(())
    }

    /// Remove files from the cache and then from the durable store.
    ///
    /// An empty id list is a no-op.
    #[tracing::instrument(skip(self, ids), fields(file.count = ids.len()))]
    pub async fn delete(&self, ids: &[FileId]) -> Result<(), AppError> {
        if ids.is_empty() {
            tracing::info!("List of file ids is empty, nothing to delete");
            return Ok(());
        }

        self.cache.remove_all(ids)?;
        self.repository.delete_files(ids).await
    }

    /// Delete durably stored files older than `days` days.
    ///
    /// The cache is left untouched; entries expire on their own.
    pub async fn sweep(&self, days: i64) -> Result<Vec<DeletedFile>, AppError> {
        self.repository.delete_files_older_than(days).await
    }
}
