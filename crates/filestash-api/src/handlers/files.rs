use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use filestash_core::{AppError, File, FileId};
use std::sync::Arc;

#[tracing::instrument(skip(state), fields(file_id = %id, operation = "get_file"))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<FileId>,
) -> Result<Json<File>, HttpAppError> {
    match state.file_service.find(id).await? {
        Some(file) => Ok(Json(file)),
        None => Err(AppError::NotFound(format!("File {} not found", id)).into()),
    }
}

/// Store an uploaded file under a new id. Responds 201 with the id as a JSON string.
#[tracing::instrument(skip(state, file), fields(operation = "create_file"))]
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    ValidatedJson(file): ValidatedJson<File>,
) -> Result<(StatusCode, Json<FileId>), HttpAppError> {
    let size = file.size();
    let id = state.file_service.create(file).await?;

    tracing::info!(file_id = %id, size_bytes = size, "File stored");
    Ok((StatusCode::CREATED, Json(id)))
}
