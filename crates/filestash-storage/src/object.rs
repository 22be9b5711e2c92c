use crate::traits::{BlobListing, BlobPayload, BlobStore, StorageError, StorageResult, StoredBlob};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectMeta, ObjectStore, ObjectStoreExt, PutOptions,
    PutPayload, Result as ObjectResult, TagSet,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Blob store backed by an `object_store` implementation (S3, Azure Blob Storage or in-memory).
#[derive(Clone)]
pub struct ObjectStoreBlobStore {
    store: Arc<dyn ObjectStore>,
    backend: StorageBackend,
    container: String,
}

impl ObjectStoreBlobStore {
    /// Wrap an already configured object store.
    pub fn new(store: Arc<dyn ObjectStore>, backend: StorageBackend, container: String) -> Self {
        Self {
            store,
            backend,
            container,
        }
    }

    /// Create an S3 backed store
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(Arc::new(store), StorageBackend::S3, bucket))
    }

    /// Create an Azure Blob Storage backed store
    ///
    /// Credentials not given explicitly are read from the `AZURE_*` environment variables.
    pub fn azure(
        account: String,
        container: String,
        access_key: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = MicrosoftAzureBuilder::from_env()
            .with_account(account)
            .with_container_name(container.clone());

        if let Some(key) = access_key {
            builder = builder.with_access_key(key);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(Arc::new(store), StorageBackend::Azure, container))
    }

    /// Create a process-local store. Contents are lost on restart.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            StorageBackend::Memory,
            "memory".to_string(),
        )
    }

    fn payload_attributes(payload: &BlobPayload) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(ref content_type) = payload.content_type {
            attributes.insert(
                Attribute::ContentType,
                AttributeValue::from(content_type.clone()),
            );
        }
        for (key, value) in &payload.metadata {
            attributes.insert(
                Attribute::Metadata(key.clone().into()),
                AttributeValue::from(value.clone()),
            );
        }
        attributes
    }

    fn payload_tags(payload: &BlobPayload) -> TagSet {
        let mut tags = TagSet::default();
        for (key, value) in &payload.tags {
            tags.push(key, value);
        }
        tags
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobStore {
    async fn init(&self) -> StorageResult<()> {
        let start = std::time::Instant::now();

        // Containers are provisioned out of band; a listing call proves it exists and is reachable.
        self.store.list_with_delimiter(None).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Container {} is not reachable: {}",
                self.container, e
            ))
        })?;

        tracing::info!(
            backend = %self.backend,
            container = %self.container,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store container verified"
        );

        Ok(())
    }

    async fn upload(&self, key: &str, payload: BlobPayload) -> StorageResult<()> {
        let size = payload.data.len() as u64;
        let location = Path::from(key);
        let opts = PutOptions {
            attributes: Self::payload_attributes(&payload),
            tags: Self::payload_tags(&payload),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(payload.data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object store upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::debug!(
            container = %self.container,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store upload successful"
        );

        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<StoredBlob> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    container = %self.container,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object store download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let mut content_type = None;
        let mut metadata = HashMap::new();
        for (attribute, value) in result.attributes.iter() {
            match attribute {
                Attribute::ContentType => content_type = Some(value.to_string()),
                Attribute::Metadata(name) => {
                    metadata.insert(name.to_string(), value.to_string());
                }
                _ => {}
            }
        }

        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            container = %self.container,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store download successful"
        );

        Ok(StoredBlob {
            data,
            content_type,
            metadata,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    container = %self.container,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object store delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::debug!(
            container = %self.container,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store delete successful"
        );

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<BlobListing>> {
        let objects: Vec<ObjectMeta> = self
            .store
            .list(None)
            .try_collect()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;

        Ok(objects
            .into_iter()
            .map(|meta| BlobListing {
                name: meta.location.to_string(),
                last_modified: Some(meta.last_modified),
            })
            .collect())
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
