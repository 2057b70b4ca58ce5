//! Task Context - Errors
//!
//! 值对象构造失败的领域错误，由应用层映射为对外错误码

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("无效的任务 ID: {0}")]
    InvalidId(&'static str),

    #[error("文本长度 {actual} 超出允许范围 [{min}, {max}]")]
    InvalidTextLength {
        actual: usize,
        min: usize,
        max: usize,
    },
}
