//! Audio Artifact Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::GetArtifact;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 下载合成产物
///
/// 只有 completed 任务有产物，其余状态一律 404
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state
        .get_artifact_handler
        .handle(GetArtifact { task_id })
        .await?;

    let file = tokio::fs::File::open(&artifact.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open artifact: {}", e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get artifact metadata: {}", e)))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
