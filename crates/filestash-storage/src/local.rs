use crate::traits::{
    BlobListing, BlobPayload, BlobProperties, BlobStore, StorageError, StorageResult, StoredBlob,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Suffix of the sidecar file holding a blob's content type, metadata and tags.
const SIDECAR_SUFFIX: &str = ".meta.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SidecarRecord {
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    metadata: BlobProperties,
    #[serde(default)]
    tags: BlobProperties,
}

/// Local filesystem blob store
///
/// Each blob is a file directly under the root directory; its properties live
/// in a JSON sidecar next to it. The data file's modification time is the
/// blob's last-modified time.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at `base_path` (e.g., "/var/lib/filestash/files")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = LocalBlobStore {
            base_path: base_path.into(),
        };
        store.init().await?;
        Ok(store)
    }

    /// Convert a key to its data file path.
    ///
    /// Keys are flat: separators, parent references and the sidecar suffix are rejected.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
            || key.ends_with(SIDECAR_SUFFIX)
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                key
            )));
        }

        Ok(self.base_path.join(key))
    }

    fn sidecar_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(SIDECAR_SUFFIX);
        PathBuf::from(sidecar)
    }

    async fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn remove_if_exists(path: &Path) -> StorageResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn init(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }

    async fn upload(&self, key: &str, payload: BlobPayload) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = payload.data.len();
        let start = std::time::Instant::now();

        let record = SidecarRecord {
            content_type: payload.content_type,
            metadata: payload.metadata,
            tags: payload.tags,
        };
        let sidecar = serde_json::to_vec(&record)
            .map_err(|e| StorageError::UploadFailed(format!("Failed to encode metadata: {}", e)))?;

        Self::write_synced(&path, &payload.data).await?;
        if let Err(e) = Self::write_synced(&Self::sidecar_path(&path), &sidecar).await {
            // A data file without its sidecar cannot be turned back into a file.
            if let Err(cleanup_err) = Self::remove_if_exists(&path).await {
                tracing::error!(
                    error = %cleanup_err,
                    path = %path.display(),
                    "Failed to remove data file after metadata write failure"
                );
            }
            return Err(e);
        }

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<StoredBlob> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            )),
        })?;

        let record = match fs::read(Self::sidecar_path(&path)).await {
            Ok(raw) => serde_json::from_slice::<SidecarRecord>(&raw).map_err(|e| {
                StorageError::DownloadFailed(format!("Corrupt metadata for {}: {}", key, e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SidecarRecord::default(),
            Err(e) => return Err(StorageError::DownloadFailed(e.to_string())),
        };

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(StoredBlob {
            data: Bytes::from(data),
            content_type: record.content_type,
            metadata: record.metadata,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        Self::remove_if_exists(&path).await?;
        Self::remove_if_exists(&Self::sidecar_path(&path)).await?;

        tracing::debug!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<BlobListing>> {
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;

        let mut listings = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(SIDECAR_SUFFIX) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, key = %name, "Failed to stat stored file");
                    listings.push(BlobListing {
                        name,
                        last_modified: None,
                    });
                    continue;
                }
            };

            listings.push(BlobListing {
                name,
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        Ok(listings)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn payload(data: &'static [u8]) -> BlobPayload {
        BlobPayload {
            data: Bytes::from_static(data),
            content_type: Some("application/json".to_string()),
            metadata: HashMap::from([("name".to_string(), "doc.json".to_string())]),
            tags: HashMap::new(),
        }
    }

    fn backdate(path: &Path, days: i64) {
        let modified =
            SystemTime::now() - std::time::Duration::from_secs(days as u64 * 24 * 60 * 60);
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    #[tokio::test]
    async fn test_local_store_upload_download() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        store.upload("file-1", payload(b"{}")).await.unwrap();
        let blob = store.download("file-1").await.unwrap();

        assert_eq!(blob.data, Bytes::from_static(b"{}"));
        assert_eq!(blob.content_type.as_deref(), Some("application/json"));
        assert_eq!(blob.metadata.get("name").map(String::as_str), Some("doc.json"));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let result = store.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = store.delete("nested/key").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = store.upload("key.meta.json", payload(b"x")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_store_download_missing() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let result = store.download("missing").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_local_store_unreadable_file_is_not_reported_missing() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        std::fs::create_dir(dir.path().join("blocked")).unwrap();

        let result = store.download("blocked").await;

        assert!(matches!(result, Err(StorageError::DownloadFailed(_))));
    }

    #[tokio::test]
    async fn test_local_store_failed_metadata_write_leaves_no_data_file() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        // A directory in the sidecar's place makes the metadata write fail.
        std::fs::create_dir(dir.path().join("file-1.meta.json")).unwrap();

        let result = store.upload("file-1", payload(b"{}")).await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!dir.path().join("file-1").exists());
        assert!(matches!(
            store.download("file-1").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_store_delete_nonexistent() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        assert!(store.delete("nonexistent").await.is_ok());
    }

    #[tokio::test]
    async fn test_local_store_delete_removes_sidecar() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        store.upload("file-1", payload(b"{}")).await.unwrap();

        store.delete("file-1").await.unwrap();

        assert!(!dir.path().join("file-1").exists());
        assert!(!dir.path().join("file-1.meta.json").exists());
    }

    #[tokio::test]
    async fn test_local_store_list_hides_sidecars() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        store.upload("a", payload(b"1")).await.unwrap();
        store.upload("b", payload(b"2")).await.unwrap();

        let mut names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_local_store_sweep_uses_modification_time() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        for key in ["old", "older", "recent"] {
            store.upload(key, payload(b"x")).await.unwrap();
        }
        backdate(&dir.path().join("old"), 200);
        backdate(&dir.path().join("older"), 250);
        backdate(&dir.path().join("recent"), 10);

        let deleted = store
            .delete_older_than(Utc::now() - Duration::days(180))
            .await
            .unwrap();

        let names: Vec<_> = deleted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["older", "old"]);
        assert!(store.download("recent").await.is_ok());
        assert!(matches!(
            store.download("old").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
