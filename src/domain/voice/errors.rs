//! Voice Context - Errors
//!
//! 值对象构造失败的领域错误，由应用层映射为对外错误码

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("无效的样本 ID: {0}")]
    InvalidId(&'static str),
}
