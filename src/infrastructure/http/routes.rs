//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   健康检查
//! - /api/voice/upload          POST  注册音色样本（multipart）
//! - /api/voice/delete          POST  删除音色样本
//! - /api/voice/list            GET   列出所有音色样本
//! - /api/voice/audio/{id}      GET   下载参考音频（供 TTS 服务回读）
//! - /api/task/submit           POST  提交文本任务
//! - /api/task/get              POST  查询任务详情
//! - /api/task/list             GET   列出任务（?status= 过滤）
//! - /api/task/delete           POST  删除任务
//! - /api/task/generate         POST  触发合成，同步等待完成
//! - /api/audio/{task_id}       GET   下载合成产物
//! - /api/presentation/extract  POST  提取演示文稿文本（multipart）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/voice", voice_routes())
        .nest("/task", task_routes())
        .route("/audio/:task_id", get(handlers::download_artifact))
        .route(
            "/presentation/extract",
            post(handlers::extract_presentation),
        )
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_voice))
        .route("/delete", post(handlers::delete_voice))
        .route("/list", get(handlers::list_voices))
        .route("/audio/:voice_id", get(handlers::download_voice_audio))
}

/// Task 路由
fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(handlers::submit_task))
        .route("/get", post(handlers::get_task))
        .route("/list", get(handlers::list_tasks))
        .route("/delete", post(handlers::delete_task))
        .route("/generate", post(handlers::generate_task))
}
