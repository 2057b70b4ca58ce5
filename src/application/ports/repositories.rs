//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::task::TaskStatus;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid state transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },

    #[error("Entity busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Voice Repository
// ============================================================================

/// 声音样本实体（用于持久化）
#[derive(Debug, Clone)]
pub struct VoiceRecord {
    pub id: String,
    /// 参考音频文件路径，注册后不可变，由注册表独占持有
    pub audio_path: PathBuf,
    pub duration_seconds: f64,
    pub created_at: DateTime<Utc>,
}

/// Voice Repository Port
#[async_trait]
pub trait VoiceRepositoryPort: Send + Sync {
    /// 保存样本；ID 冲突返回 `Duplicate`，不覆盖已有记录
    async fn insert(&self, voice: &VoiceRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找样本
    async fn find_by_id(&self, id: &str) -> Result<Option<VoiceRecord>, RepositoryError>;

    /// 获取所有样本，按创建时间升序
    async fn find_all(&self) -> Result<Vec<VoiceRecord>, RepositoryError>;

    /// 删除样本
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

// ============================================================================
// Task Repository
// ============================================================================

/// 文本任务实体（用于持久化）
///
/// 不变量: `output_audio` 非空 当且仅当 `status == Completed`
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task_id: String,
    pub text: String,
    /// 弱引用：样本可被独立删除，生成时重新校验
    pub voice_id: String,
    pub status: TaskStatus,
    pub output_audio: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new_pending(task_id: String, text: String, voice_id: String) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            text,
            voice_id,
            status: TaskStatus::Pending,
            output_audio: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Task Repository Port
///
/// 状态转移通过专用方法而非整行覆盖，终态写入与产物引用保持原子
#[async_trait]
pub trait TaskRepositoryPort: Send + Sync {
    /// 保存新任务；ID 冲突返回 `Duplicate`
    async fn insert(&self, task: &TaskRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找任务
    async fn find_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>, RepositoryError>;

    /// 获取任务列表，按创建时间升序，可按单一状态过滤
    async fn find_all(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskRecord>, RepositoryError>;

    /// pending/failed → processing；其他当前状态返回 `InvalidTransition`
    ///
    /// 进入 processing 时清空上一次的错误信息
    async fn mark_processing(&self, task_id: &str) -> Result<(), RepositoryError>;

    /// processing → completed，同时写入产物引用（单条 UPDATE，原子）
    async fn mark_completed(
        &self,
        task_id: &str,
        output_audio: &str,
    ) -> Result<(), RepositoryError>;

    /// processing → failed，同时记录错误信息
    async fn mark_failed(&self, task_id: &str, error: &str) -> Result<(), RepositoryError>;

    /// 删除任务记录
    ///
    /// processing 行不可删除（返回 `Busy`）；删除条件必须与
    /// 状态检查在同一条语句中，读后删的窗口不允许存在
    async fn delete(&self, task_id: &str) -> Result<(), RepositoryError>;

    /// 启动恢复：将崩溃遗留的 processing 任务重置为 pending，返回重置数量
    async fn reset_stale_processing(&self) -> Result<u64, RepositoryError>;
}
