//! Task Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{TaskRecord, TaskRepositoryPort};
use crate::application::queries::{GetTask, ListTasks};
use crate::domain::task::TaskStatus;

/// 任务摘要
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub task_id: String,
    pub voice_id: String,
    pub status: TaskStatus,
    pub text_chars: usize,
    pub output_audio: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TaskRecord> for TaskSummary {
    fn from(record: TaskRecord) -> Self {
        Self {
            task_id: record.task_id,
            voice_id: record.voice_id,
            status: record.status,
            text_chars: record.text.chars().count(),
            output_audio: record.output_audio,
            error: record.error,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// ListTasks Handler
///
/// 只读查询，按创建时间升序，可按单一状态过滤
pub struct ListTasksHandler {
    task_repo: Arc<dyn TaskRepositoryPort>,
}

impl ListTasksHandler {
    pub fn new(task_repo: Arc<dyn TaskRepositoryPort>) -> Self {
        Self { task_repo }
    }

    pub async fn handle(&self, query: ListTasks) -> Result<Vec<TaskSummary>, ApplicationError> {
        let tasks = self.task_repo.find_all(query.status).await?;
        Ok(tasks.into_iter().map(TaskSummary::from).collect())
    }
}

/// GetTask Handler
pub struct GetTaskHandler {
    task_repo: Arc<dyn TaskRepositoryPort>,
}

impl GetTaskHandler {
    pub fn new(task_repo: Arc<dyn TaskRepositoryPort>) -> Self {
        Self { task_repo }
    }

    pub async fn handle(&self, query: GetTask) -> Result<TaskSummary, ApplicationError> {
        let task = self
            .task_repo
            .find_by_id(&query.task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Task", &query.task_id))?;
        Ok(TaskSummary::from(task))
    }
}
