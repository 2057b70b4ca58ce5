//! Slide Extractor Port - 演示文稿文本提取
//!
//! 解析幻灯片容器，按页序产出每页文本。无状态纯函数，
//! 结果直接交给调用方，本子系统不持久化任何内容。
//! 具体实现在 infrastructure/adapters/pptx 层。

use thiserror::Error;

/// 提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Slide Extractor Port
pub trait SlideExtractorPort: Send + Sync {
    /// 按文稿页序提取文本，每页一个文本块，保留块内换行
    ///
    /// 空文稿（无幻灯片）返回空序列而非错误；
    /// 不截断、不校验长度，重新提交的长度约束由调用方负责
    fn extract(&self, file_bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}
