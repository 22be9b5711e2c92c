//! File cache
//!
//! The fast tier in front of the durable store. `FileService` writes through it
//! and reads from it first; it never warms it on a read miss.

use filestash_core::{AppError, File, FileId};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache lock poisoned")]
    Poisoned,

    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::Cache(err.to_string())
    }
}

/// Key/value cache of files by id.
///
/// Implementations decide their own eviction policy. A miss is `Ok(None)`;
/// `Err` means the cache itself failed.
pub trait FileCache: Send + Sync {
    fn get(&self, id: &FileId) -> Result<Option<File>, CacheError>;

    fn put(&self, id: FileId, file: File) -> Result<(), CacheError>;

    fn remove(&self, id: &FileId) -> Result<(), CacheError>;

    fn remove_all(&self, ids: &[FileId]) -> Result<(), CacheError>;
}

struct CachedFile {
    file: File,
    inserted_at: Instant,
}

/// Bounded in-process cache with least-recently-used eviction and a per-entry time to live.
pub struct LruFileCache {
    entries: Mutex<LruCache<FileId, CachedFile>>,
    ttl: Duration,
}

impl LruFileCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileCache for LruFileCache {
    fn get(&self, id: &FileId) -> Result<Option<File>, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        let expired = match entries.get(id) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Ok(Some(entry.file.clone()))
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(id);
            tracing::debug!(file_id = %id, "Evicted expired cache entry");
        }
        Ok(None)
    }

    fn put(&self, id: FileId, file: File) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.put(
            id,
            CachedFile {
                file,
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, id: &FileId) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.pop(id);
        Ok(())
    }

    fn remove_all(&self, ids: &[FileId]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        for id in ids {
            entries.pop(id);
        }
        Ok(())
    }
}
