//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，承载完整的业务错误分类

use thiserror::Error;

use crate::application::ports::{
    AudioStorageError, ExtractError, ProbeError, RepositoryError, TtsError,
};
use crate::domain::task::TaskError;
use crate::domain::voice::VoiceError;

/// 应用层错误
///
/// 校验类错误（InvalidTextLength / InvalidAudio / DuplicateId / UnknownVoice）
/// 在提交/注册路径同步返回，不产生任何存储记录；
/// 生成类错误（ModelFailure / Timeout）同时记录在任务上并返回给等待方
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 空的上传负载
    #[error("Empty audio payload")]
    EmptyPayload,

    /// 不可解码或不合规的参考音频
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// 不可读或不支持的演示文稿容器
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// 提交文本长度越界
    #[error("Invalid text length {actual}, expected {min}..={max} chars")]
    InvalidTextLength {
        actual: usize,
        min: usize,
        max: usize,
    },

    /// 自定义 ID 格式非法
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// voice_id 在注册表中不存在
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    /// 调用方提供的 ID 已被占用
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 同一任务已有在途生成，或任务在合成中被删除
    #[error("Task busy: {0}")]
    TaskBusy(String),

    /// 合成超时
    #[error("Synthesis timed out")]
    Timeout,

    /// 合成模型/运行时失败
    #[error("Model failure: {0}")]
    ModelFailure(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<TaskError> for ApplicationError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::InvalidId(reason) => Self::InvalidId(reason.to_string()),
            TaskError::InvalidTextLength { actual, min, max } => {
                Self::InvalidTextLength { actual, min, max }
            }
        }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidId(reason) => Self::InvalidId(reason.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::not_found("Entity", id),
            RepositoryError::Duplicate(id) => Self::DuplicateId(id),
            RepositoryError::Busy(id) => Self::TaskBusy(id),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<ProbeError> for ApplicationError {
    fn from(err: ProbeError) -> Self {
        Self::InvalidAudio(err.to_string())
    }
}

impl From<ExtractError> for ApplicationError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidDocument(msg) => Self::InvalidDocument(msg),
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::Timeout => Self::Timeout,
            other => Self::ModelFailure(other.to_string()),
        }
    }
}
