//! Storage setup and initialization

use anyhow::Result;
use filestash_core::Config;
use filestash_storage::{create_blob_store, BlobStore};
use std::sync::Arc;

/// Build the configured blob store and make sure its container is reachable.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob storage...");
    let store = create_blob_store(config).await?;
    tracing::info!(
        backend = %store.backend_type(),
        "Blob storage initialized successfully"
    );
    Ok(store)
}
