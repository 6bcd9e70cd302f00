use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;

use crate::application::services::{QueueError, SubmitError};
use crate::presentation::state::AppState;

const NO_FILE_MESSAGE: &str = "No file uploaded";

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub task_id: String,
    pub check_url: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, Bytes)> = None;
    let mut prompt_addon = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                )
                    .into_response();
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(data) => file = Some((filename, data)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read file bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file: {}", e),
                        )
                            .into_response();
                    }
                }
            }
            Some("prompt_addon") => match field.text().await {
                Ok(text) => prompt_addon = text,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read prompt_addon");
                    return (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read prompt_addon: {}", e),
                    )
                        .into_response();
                }
            },
            _ => {}
        }
    }

    let Some((filename, data)) = file.filter(|(name, _)| !name.trim().is_empty()) else {
        tracing::warn!("Upload request with no file");
        return (StatusCode::BAD_REQUEST, NO_FILE_MESSAGE).into_response();
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File upload received");

    let body = futures::stream::once(async move { Ok::<_, std::io::Error>(data) }).boxed();
    match state
        .task_service
        .submit(&filename, body, prompt_addon)
        .await
    {
        Ok(task_id) => Json(UploadResponse {
            message: "Upload received. Processing in the background.".to_string(),
            task_id: task_id.to_string(),
            check_url: format!("/result/{}", task_id),
        })
        .into_response(),
        Err(SubmitError::MissingFile) => {
            (StatusCode::BAD_REQUEST, NO_FILE_MESSAGE).into_response()
        }
        Err(SubmitError::Queue(e)) => {
            tracing::warn!(error = %e, "Upload rejected, task queue unavailable");
            let error = match e {
                QueueError::Full => "Task queue is full, try again later",
                QueueError::Closed => "Task processing is unavailable",
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to accept upload");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to accept upload: {}", e),
                }),
            )
                .into_response()
        }
    }
}
