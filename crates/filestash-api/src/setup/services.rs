//! Service wiring

use crate::state::AppState;
use filestash_core::Config;
use filestash_services::{
    FileRepository, FileService, InstanceDeletedHandler, LruFileCache, RetentionService,
};
use filestash_storage::BlobStore;
use std::sync::Arc;

/// Wire the cache, repository and services on top of a blob store.
pub fn initialize_services(
    config: &Config,
    store: Arc<dyn BlobStore>,
) -> (Arc<AppState>, Arc<RetentionService>) {
    let cache = Arc::new(LruFileCache::new(
        config.cache_max_entries(),
        config.cache_ttl(),
    ));
    tracing::info!(
        max_entries = config.cache_max_entries(),
        ttl_secs = config.cache_ttl().as_secs(),
        "File cache initialized"
    );

    let file_service = Arc::new(FileService::new(cache, FileRepository::new(store)));
    let instance_deleted_handler = InstanceDeletedHandler::new(file_service.clone());
    let retention = Arc::new(RetentionService::new(
        file_service.clone(),
        config.retention().clone(),
    ));

    let state = Arc::new(AppState {
        config: config.clone(),
        file_service,
        instance_deleted_handler,
    });

    (state, retention)
}
