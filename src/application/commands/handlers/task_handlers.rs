//! Task Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteTask, SubmitTask};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, TaskRecord, TaskRepositoryPort, VoiceRepositoryPort,
};
use crate::domain::task::{TaskId, TaskStatus, TaskText};

// ============================================================================
// SubmitTask
// ============================================================================

/// 提交任务响应
#[derive(Debug, Clone)]
pub struct SubmitTaskResponse {
    pub task_id: String,
}

/// SubmitTask Handler
///
/// 只做校验与落库，不触发任何合成工作，
/// 慢速的模型调用永远不会阻塞提交路径。
/// 校验顺序: 文本长度 → voice_id 可解析 → 任务 ID 冲突
pub struct SubmitTaskHandler {
    task_repo: Arc<dyn TaskRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    min_text_chars: usize,
    max_text_chars: usize,
}

impl SubmitTaskHandler {
    pub fn new(
        task_repo: Arc<dyn TaskRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        min_text_chars: usize,
        max_text_chars: usize,
    ) -> Self {
        Self {
            task_repo,
            voice_repo,
            min_text_chars,
            max_text_chars,
        }
    }

    pub async fn handle(&self, command: SubmitTask) -> Result<SubmitTaskResponse, ApplicationError> {
        let text = TaskText::new(command.text, self.min_text_chars, self.max_text_chars)?;

        // voice_id 必须在提交时可解析；之后样本可被独立删除（弱引用）
        if self
            .voice_repo
            .find_by_id(&command.voice_id)
            .await?
            .is_none()
        {
            return Err(ApplicationError::UnknownVoice(command.voice_id));
        }

        let task_id = match command.custom_task_id {
            Some(id) => {
                let id = TaskId::custom(id)?;
                if self.task_repo.find_by_id(id.as_str()).await?.is_some() {
                    return Err(ApplicationError::DuplicateId(id.into_string()));
                }
                id
            }
            None => TaskId::generate(),
        };

        let record = TaskRecord::new_pending(
            task_id.as_str().to_string(),
            text.into_string(),
            command.voice_id,
        );
        self.task_repo.insert(&record).await?;

        tracing::info!(
            task_id = %task_id,
            voice_id = %record.voice_id,
            text_chars = record.text.chars().count(),
            "Text task submitted"
        );

        Ok(SubmitTaskResponse {
            task_id: task_id.into_string(),
        })
    }
}

// ============================================================================
// DeleteTask
// ============================================================================

/// DeleteTask Handler
///
/// 删除策略: 任务处于 processing 时拒绝删除并返回 TaskBusy，
/// 调用方可在合成结束后重试。删除不可逆，任务记录与产物一并移除
pub struct DeleteTaskHandler {
    task_repo: Arc<dyn TaskRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteTaskHandler {
    pub fn new(task_repo: Arc<dyn TaskRepositoryPort>, storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { task_repo, storage }
    }

    pub async fn handle(&self, command: DeleteTask) -> Result<(), ApplicationError> {
        let task = self
            .task_repo
            .find_by_id(&command.task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Task", &command.task_id))?;

        if task.status == TaskStatus::Processing {
            return Err(ApplicationError::TaskBusy(task.task_id));
        }

        // 上面的读只是快速路径；权威检查在仓储的条件 DELETE 里，
        // 引擎在读后赢得 mark_processing 时这里得到 Busy 而不是删行
        self.task_repo.delete(&task.task_id).await?;

        if let Some(artifact) = &task.output_audio {
            if let Err(e) = self.storage.delete_artifact(artifact).await {
                tracing::warn!(
                    task_id = %task.task_id,
                    artifact = %artifact,
                    error = %e,
                    "Failed to delete task artifact"
                );
            }
        }

        tracing::info!(task_id = %task.task_id, "Task deleted");
        Ok(())
    }
}
