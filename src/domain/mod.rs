//! 领域层
//!
//! Bounded Contexts:
//! - Voice Context: 声音样本（克隆参考音频）
//! - Task Context: 文本合成任务

pub mod task;
pub mod voice;
