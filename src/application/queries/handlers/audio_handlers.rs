//! Audio Query Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{AudioStoragePort, TaskRepositoryPort};
use crate::application::queries::GetArtifact;
use crate::domain::task::TaskStatus;

/// 可下载的产物文件
#[derive(Debug, Clone)]
pub struct ArtifactFile {
    pub filename: String,
    pub path: PathBuf,
}

/// GetArtifact Handler
///
/// 只有 completed 任务才有产物；其他状态一律 NotFound，
/// 不暴露半成品文件
pub struct GetArtifactHandler {
    task_repo: Arc<dyn TaskRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl GetArtifactHandler {
    pub fn new(task_repo: Arc<dyn TaskRepositoryPort>, storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { task_repo, storage }
    }

    pub async fn handle(&self, query: GetArtifact) -> Result<ArtifactFile, ApplicationError> {
        let task = self
            .task_repo
            .find_by_id(&query.task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Task", &query.task_id))?;

        if task.status != TaskStatus::Completed {
            return Err(ApplicationError::not_found("Artifact", &query.task_id));
        }

        let filename = task
            .output_audio
            .ok_or_else(|| ApplicationError::internal("completed task missing output_audio"))?;

        Ok(ArtifactFile {
            path: self.storage.artifact_path(&filename),
            filename,
        })
    }
}
