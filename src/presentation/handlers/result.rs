use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::{Task, TaskId, TaskOutcome};
use crate::presentation::state::AppState;

/// Poll payload. Terminal records serialize identically on every poll.
#[derive(Debug, Serialize)]
pub struct TaskRecordResponse {
    pub task_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskRecordResponse {
    fn from(task: Task) -> Self {
        let (transcript, summary, message) = match task.outcome {
            Some(TaskOutcome::Done {
                transcript,
                summary,
            }) => (Some(transcript), Some(summary), None),
            Some(TaskOutcome::Error { message }) => (None, None, Some(message)),
            None => (None, None, None),
        };

        Self {
            task_id: task.id.to_string(),
            status: task.status.as_str(),
            stage: task.stage.map(|s| s.as_str()),
            transcript,
            summary,
            message,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct NotFoundResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            status: "not_found",
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn result_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    let Some(id) = TaskId::parse(&task_id) else {
        return not_found();
    };

    match state.task_service.poll(id).await {
        Ok(Some(task)) => (StatusCode::OK, Json(TaskRecordResponse::from(task))).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch task record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch task: {}", e),
                }),
            )
                .into_response()
        }
    }
}
