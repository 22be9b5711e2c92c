#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
#[cfg(feature = "storage-object")]
use crate::ObjectStoreBlobStore;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use filestash_core::Config;
use std::sync::Arc;

/// Create and initialise a blob store based on configuration
///
/// Without an explicit `STORAGE_BACKEND` the in-memory store is used.
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    let backend = config.storage_backend().unwrap_or(StorageBackend::Memory);

    let store: Arc<dyn BlobStore> = match backend {
        #[cfg(feature = "storage-object")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .or_else(|| config.aws_region())
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            Arc::new(ObjectStoreBlobStore::s3(bucket, region, endpoint)?)
        }

        #[cfg(feature = "storage-object")]
        StorageBackend::Azure => {
            let account = config.azure_account().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("AZURE_STORAGE_ACCOUNT not configured".to_string())
            })?;
            let access_key = config.azure_access_key().map(String::from);

            Arc::new(ObjectStoreBlobStore::azure(
                account,
                config.azure_container().to_string(),
                access_key,
            )?)
        }

        #[cfg(feature = "storage-object")]
        StorageBackend::Memory => Arc::new(ObjectStoreBlobStore::in_memory()),

        #[cfg(not(feature = "storage-object"))]
        StorageBackend::S3 | StorageBackend::Azure | StorageBackend::Memory => {
            return Err(StorageError::ConfigError(format!(
                "{} storage backend not available (storage-object feature not enabled)",
                backend
            )))
        }

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            Arc::new(LocalBlobStore::new(base_path).await?)
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => {
            return Err(StorageError::ConfigError(
                "Local storage backend not available (storage-local feature not enabled)"
                    .to_string(),
            ))
        }
    };

    store.init().await?;
    Ok(store)
}
