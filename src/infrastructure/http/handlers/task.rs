//! Task HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{DeleteTask, GetTask, ListTasks, SubmitTask, TaskSummary};
use crate::domain::task::TaskStatus;
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    pub text: String,
    pub voice_id: String,
    /// 调用方自定义任务 ID，缺省时服务端生成
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitTaskResponse {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetTaskRequest {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTaskRequest {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub task_id: String,
    pub output_audio: String,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub voice_id: String,
    pub status: String,
    pub text_chars: usize,
    pub output_audio: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TaskSummary> for TaskResponse {
    fn from(summary: TaskSummary) -> Self {
        Self {
            task_id: summary.task_id,
            voice_id: summary.voice_id,
            status: summary.status.as_str().to_string(),
            text_chars: summary.text_chars,
            output_audio: summary.output_audio,
            error: summary.error,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 提交文本任务（只校验与落库，不触发合成）
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<Json<ApiResponse<SubmitTaskResponse>>, ApiError> {
    let command = SubmitTask {
        text: req.text,
        voice_id: req.voice_id,
        custom_task_id: req.task_id,
    };

    let result = state.submit_task_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(SubmitTaskResponse {
        task_id: result.task_id,
    })))
}

/// 列出任务，可按单一状态过滤
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTasksQuery>,
) -> Result<Json<ApiResponse<Vec<TaskResponse>>>, ApiError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(TaskStatus::from_str(s).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown task status filter: {}", s))
        })?),
    };

    let result = state.list_tasks_handler.handle(ListTasks { status }).await?;

    let responses: Vec<TaskResponse> = result.into_iter().map(TaskResponse::from).collect();

    Ok(Json(ApiResponse::success(responses)))
}

/// 获取任务详情（状态轮询）
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetTaskRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>, ApiError> {
    let result = state
        .get_task_handler
        .handle(GetTask {
            task_id: req.task_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(TaskResponse::from(result))))
}

/// 删除任务
///
/// 合成中的任务拒绝删除（TaskBusy），其余状态连同产物一起清除
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteTaskRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteTask {
        task_id: req.task_id,
    };
    state.delete_task_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 触发任务合成
///
/// 同步等待合成完成；completed 任务立即返回既有产物引用
pub async fn generate_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, ApiError> {
    let outcome = state.synthesis_engine.generate(&req.task_id).await?;

    Ok(Json(ApiResponse::success(GenerateResponse {
        task_id: outcome.task_id,
        output_audio: outcome.output_audio,
        download_url: outcome.download_url,
    })))
}
