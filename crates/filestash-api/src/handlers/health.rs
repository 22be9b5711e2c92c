use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub environment: String,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        storage: state.storage_backend().to_string(),
        environment: state.config.environment().to_string(),
    })
}
