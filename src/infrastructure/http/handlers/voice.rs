//! Voice HTTP Handlers

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::{DeleteVoice, ListVoices, RegisterVoice};
use crate::domain::voice::AudioFormat;
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: String,
    pub duration_seconds: f64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct UploadVoiceResponse {
    pub id: String,
    pub duration_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteVoiceRequest {
    pub id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 注册音色样本（multipart: file 必填，id 选填）
pub async fn upload_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadVoiceResponse>>, ApiError> {
    let mut custom_id: Option<String> = None;
    let mut audio_data: Option<Vec<u8>> = None;
    let mut format: Option<AudioFormat> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read id: {}", e)))?;
                if !value.is_empty() {
                    custom_id = Some(value);
                }
            }
            "file" => {
                let ext = field
                    .file_name()
                    .map(|s| s.to_string())
                    .as_ref()
                    .and_then(|f| {
                        PathBuf::from(f)
                            .extension()
                            .and_then(|e| e.to_str())
                            .map(|s| s.to_lowercase())
                    });

                format = Some(
                    ext.as_deref()
                        .and_then(AudioFormat::from_extension)
                        .ok_or_else(|| {
                            ApiError::BadRequest(
                                "Only WAV, MP3, FLAC, OGG audio files are allowed".to_string(),
                            )
                        })?,
                );

                audio_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let audio_data =
        audio_data.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;
    let format = format.unwrap_or(AudioFormat::Wav);

    let command = RegisterVoice {
        audio_bytes: audio_data,
        format,
        custom_id,
    };

    let result = state.register_voice_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(UploadVoiceResponse {
        id: result.id,
        duration_seconds: result.duration_seconds,
    })))
}

/// 获取音色样本列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<VoiceResponse>>>, ApiError> {
    let result = state.list_voices_handler.handle(ListVoices).await?;

    let responses: Vec<VoiceResponse> = result
        .into_iter()
        .map(|v| VoiceResponse {
            id: v.id,
            duration_seconds: v.duration_seconds,
            created_at: v.created_at,
        })
        .collect();

    Ok(Json(ApiResponse::success(responses)))
}

/// 删除音色样本
///
/// 引用该样本的任务不受影响，之后生成时以 UnknownVoice 失败
pub async fn delete_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteVoiceRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteVoice { voice_id: req.id };
    state.delete_voice_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 下载音色参考音频（供外部 TTS 服务回读）
pub async fn download_voice_audio(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<String>,
) -> Result<Response, ApiError> {
    let voice = state
        .voice_repo
        .find_by_id(&voice_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Voice not found: {}", voice_id)))?;

    let audio_path = &voice.audio_path;
    if !audio_path.exists() {
        return Err(ApiError::NotFound(format!(
            "Voice audio file not found: {}",
            voice_id
        )));
    }

    let file = tokio::fs::File::open(&audio_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;
    let file_size = metadata.len();

    let ext = audio_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    let content_type = AudioFormat::from_extension(ext)
        .map(|f| f.content_type())
        .unwrap_or("application/octet-stream");

    // 流式返回文件内容
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.{}\"", voice_id, ext),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
