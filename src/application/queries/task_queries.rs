//! Task Queries

use crate::domain::task::TaskStatus;

/// 列出任务查询，可按单一状态过滤
#[derive(Debug, Clone)]
pub struct ListTasks {
    pub status: Option<TaskStatus>,
}

/// 获取任务详情查询
#[derive(Debug, Clone)]
pub struct GetTask {
    pub task_id: String,
}
