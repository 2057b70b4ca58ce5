//! Task Context - 文本合成任务限界上下文
//!
//! 职责:
//! - 任务 ID 分配与校验
//! - 任务状态机 (pending → processing → completed/failed)
//! - 提交文本长度约束

mod errors;
mod value_objects;

pub use errors::TaskError;
pub use value_objects::{TaskId, TaskStatus, TaskText};
