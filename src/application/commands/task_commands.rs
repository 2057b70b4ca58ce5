//! Task Commands

/// 提交文本任务命令
#[derive(Debug, Clone)]
pub struct SubmitTask {
    pub text: String,
    pub voice_id: String,
    /// 调用方自定义的任务 ID，缺省则由系统生成
    pub custom_task_id: Option<String>,
}

/// 删除任务命令
#[derive(Debug, Clone)]
pub struct DeleteTask {
    pub task_id: String,
}
