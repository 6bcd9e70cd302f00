use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Tasks waiting in the queue or being processed.
    pub queued_tasks: usize,
    /// Records currently held; absent when the store cannot be read.
    pub tracked_tasks: Option<usize>,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        queued_tasks: state.task_service.outstanding(),
        tracked_tasks: state.task_service.tracked().await.ok(),
    })
}
