//! Application state shared by the HTTP handlers.

use filestash_core::{Config, StorageBackend};
use filestash_services::{FileService, InstanceDeletedHandler};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub file_service: Arc<FileService>,
    pub instance_deleted_handler: InstanceDeletedHandler,
}

impl AppState {
    pub fn storage_backend(&self) -> StorageBackend {
        self.file_service.repository().backend_type()
    }
}
