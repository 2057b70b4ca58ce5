//! Voice Context - 声音样本限界上下文
//!
//! 职责:
//! - 参考音频（克隆目标）管理
//! - 样本 ID 分配与校验
//! - 时长元数据

mod errors;
mod value_objects;

pub use errors::VoiceError;
pub use value_objects::{AudioFormat, SampleId};
