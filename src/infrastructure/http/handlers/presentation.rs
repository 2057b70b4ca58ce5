//! Presentation HTTP Handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::application::ExtractSlides;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub slide_count: usize,
    /// 每页一个条目，保持原始页序；无文本的页为空字符串
    pub slides: Vec<String>,
}

/// 提取演示文稿文本（multipart: file）
///
/// 无状态转换，不产生任何持久化记录
pub async fn extract_presentation(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ExtractResponse>>, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name().unwrap_or_default() == "file" {
            file_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

    let result = state
        .extract_slides_handler
        .handle(ExtractSlides { file_bytes })
        .await?;

    Ok(Json(ApiResponse::success(ExtractResponse {
        slide_count: result.slide_count,
        slides: result.slides,
    })))
}
