//! Hand-written doubles for the cache and blob store.

use crate::cache::{CacheError, FileCache};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use filestash_core::{File, FileId, StorageBackend};
use filestash_storage::{
    BlobListing, BlobPayload, BlobStore, StorageError, StorageResult, StoredBlob,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn sample_file(name: &str) -> File {
    File {
        name: name.to_string(),
        source_application_id: Some(1),
        source_application_instance_id: Some("instance-1".to_string()),
        media_type: Some("text/plain".to_string()),
        encoding: Some("UTF-8".to_string()),
        contents: format!("contents of {}", name).into_bytes(),
    }
}

#[derive(Default)]
pub(crate) struct FakeBlobStore {
    objects: Mutex<HashMap<String, (BlobPayload, DateTime<Utc>)>>,
    pub fail_uploads: AtomicBool,
    pub fail_downloads: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_listing: AtomicBool,
    pub uploads: AtomicUsize,
    pub downloads: AtomicUsize,
    pub deletes: AtomicUsize,
    pub listings: AtomicUsize,
}

impl FakeBlobStore {
    pub fn insert_aged(&self, key: &str, payload: BlobPayload, days_old: i64) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            (payload, Utc::now() - Duration::days(days_old)),
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn upload(&self, key: &str, payload: BlobPayload) -> StorageResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("store unavailable".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (payload, Utc::now()));
        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<StoredBlob> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(StorageError::DownloadFailed("store unavailable".to_string()));
        }
        let objects = self.objects.lock().unwrap();
        let (payload, _) = objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(StoredBlob {
            data: payload.data.clone(),
            content_type: payload.content_type.clone(),
            metadata: payload.metadata.clone(),
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("store unavailable".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<BlobListing>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StorageError::ListFailed("store unavailable".to_string()));
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, (_, modified))| BlobListing {
                name: key.clone(),
                last_modified: Some(*modified),
            })
            .collect())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Map-backed cache that records every call and can be told to fail.
#[derive(Default)]
pub(crate) struct RecordingCache {
    entries: Mutex<HashMap<FileId, File>>,
    pub fail_gets: AtomicBool,
    pub fail_puts: AtomicBool,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub removes: AtomicUsize,
}

impl RecordingCache {
    pub fn contains(&self, id: &FileId) -> bool {
        self.entries.lock().unwrap().contains_key(id)
    }

    pub fn seed(&self, id: FileId, file: File) {
        self.entries.lock().unwrap().insert(id, file);
    }
}

impl FileCache for RecordingCache {
    fn get(&self, id: &FileId) -> Result<Option<File>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("cache down".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(id).cloned())
    }

    fn put(&self, id: FileId, file: File) -> Result<(), CacheError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("cache down".to_string()));
        }
        self.entries.lock().unwrap().insert(id, file);
        Ok(())
    }

    fn remove(&self, id: &FileId) -> Result<(), CacheError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().remove(id);
        Ok(())
    }

    fn remove_all(&self, ids: &[FileId]) -> Result<(), CacheError> {
        self.removes.fetch_add(ids.len(), Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();
        for id in ids {
            entries.remove(id);
        }
        Ok(())
    }
}
