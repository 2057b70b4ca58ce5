//! Audio Queries

/// 获取任务产物查询
#[derive(Debug, Clone)]
pub struct GetArtifact {
    pub task_id: String,
}
