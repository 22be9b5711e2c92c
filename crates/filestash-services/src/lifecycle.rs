use crate::file_service::FileService;
use filestash_core::{AppError, InstanceDeletedEvent};
use std::sync::Arc;

/// Name of the upstream event signalling that an instance and its files are gone.
pub const INSTANCE_DELETED_EVENT: &str = "instance-deleted";

/// Deletes the files of an instance when the instance is deleted upstream.
///
/// `handle` resolves only after the delete has finished, so the caller can
/// acknowledge the event on `Ok` and leave it unacknowledged on `Err`.
#[derive(Clone)]
pub struct InstanceDeletedHandler {
    file_service: Arc<FileService>,
}

impl InstanceDeletedHandler {
    pub fn new(file_service: Arc<FileService>) -> Self {
        Self { file_service }
    }

    #[tracing::instrument(
        skip(self, event),
        fields(event.name = INSTANCE_DELETED_EVENT, instance.id = ?event.headers.instance_id)
    )]
    pub async fn handle(&self, event: &InstanceDeletedEvent) -> Result<(), AppError> {
        let file_ids = event.file_ids();
        tracing::info!(
            headers = %event.headers,
            file_count = file_ids.len(),
            "Deleting file(s) related to instance flow"
        );

        match self.file_service.delete(file_ids).await {
            Ok(()) => {
                tracing::info!(
                    headers = %event.headers,
                    "Successfully deleted file(s) related to instance flow"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    headers = %event.headers,
                    "Could not delete file(s) related to instance flow"
                );
                Err(e)
            }
        }
    }
}
