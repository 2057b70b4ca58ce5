//! Task Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::TaskError;

/// 任务唯一标识
///
/// 与 SampleId 同样的字符集约束，调用方可自定义
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// 生成新的随机任务 ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 使用调用方提供的自定义 ID
    pub fn custom(id: impl Into<String>) -> Result<Self, TaskError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TaskError::InvalidId("任务 ID 不能为空"));
        }
        if id.len() > 64 {
            return Err(TaskError::InvalidId("任务 ID 长度不能超过64字符"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TaskError::InvalidId(
                "任务 ID 只能包含字母、数字、下划线和连字符",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 任务状态
///
/// 状态机: pending → processing → {completed, failed}
/// - 终态只能由合成引擎写入
/// - failed 可经重试回到 processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 等待合成
    Pending,
    /// 正在合成
    Processing,
    /// 合成完成
    Completed,
    /// 合成失败
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "processing" => Some(TaskStatus::Processing),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    /// 合法状态转移
    ///
    /// completed 是不可逆终态；failed 允许重试（等价于回到 pending 再进入 processing）
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Processing)
                | (TaskStatus::Failed, TaskStatus::Processing)
                | (TaskStatus::Processing, TaskStatus::Completed)
                | (TaskStatus::Processing, TaskStatus::Failed)
                | (TaskStatus::Processing, TaskStatus::Pending)
        )
    }
}

/// 提交文本
///
/// 不变量: 字符数（按 Unicode 标量计）在闭区间 [min_chars, max_chars] 内
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskText(String);

impl TaskText {
    pub fn new(
        text: impl Into<String>,
        min_chars: usize,
        max_chars: usize,
    ) -> Result<Self, TaskError> {
        let text = text.into();
        let len = text.chars().count();
        if len < min_chars || len > max_chars {
            return Err(TaskError::InvalidTextLength {
                actual: len,
                min: min_chars,
                max: max_chars,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            TaskStatus::Pending,
            TaskStatus::Processing,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert_eq!(TaskStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(TaskStatus::from_str("cancelled"), None);
    }

    #[test]
    fn test_no_transition_out_of_completed() {
        for next in [
            TaskStatus::Pending,
            TaskStatus::Processing,
            TaskStatus::Failed,
        ] {
            assert!(!TaskStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn test_failed_is_retryable() {
        assert!(TaskStatus::Failed.can_transition_to(TaskStatus::Processing));
        assert!(!TaskStatus::Failed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_text_length_bounds_inclusive() {
        assert!(TaskText::new("x".repeat(799), 800, 2000).is_err());
        assert!(TaskText::new("x".repeat(800), 800, 2000).is_ok());
        assert!(TaskText::new("x".repeat(2000), 800, 2000).is_ok());
        assert!(TaskText::new("x".repeat(2001), 800, 2000).is_err());
    }

    #[test]
    fn test_custom_task_id_validation() {
        assert!(TaskId::custom("lesson-01_intro").is_ok());
        assert!(matches!(TaskId::custom(""), Err(TaskError::InvalidId(_))));
        assert!(matches!(TaskId::custom("第一课"), Err(TaskError::InvalidId(_))));
        assert!(matches!(
            TaskId::custom("x".repeat(65)),
            Err(TaskError::InvalidId(_))
        ));
    }

    #[test]
    fn test_text_error_reports_actual_length() {
        let err = TaskText::new("x".repeat(10), 800, 2000).unwrap_err();
        assert_eq!(
            err,
            TaskError::InvalidTextLength {
                actual: 10,
                min: 800,
                max: 2000
            }
        );
    }

    #[test]
    fn test_text_length_counts_chars_not_bytes() {
        // 800 个汉字 = 2400 字节，但字符数满足下界
        let text = "课".repeat(800);
        let t = TaskText::new(text, 800, 2000).unwrap();
        assert_eq!(t.char_count(), 800);
    }
}
