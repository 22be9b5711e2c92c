use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};
use filestash_core::InstanceDeletedEvent;
use std::sync::Arc;

/// Receive an instance-deleted event.
///
/// 204 acknowledges the event once every file is gone; any error status leaves
/// it unacknowledged so the publisher redelivers it.
pub async fn instance_deleted(
    State(state): State<Arc<AppState>>,
    ValidatedJson(event): ValidatedJson<InstanceDeletedEvent>,
) -> Result<StatusCode, HttpAppError> {
    state.instance_deleted_handler.handle(&event).await?;
    Ok(StatusCode::NO_CONTENT)
}
