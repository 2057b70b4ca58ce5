//! Presentation Queries

/// 提取演示文稿文本查询
///
/// 无状态：结果直接返回调用方，不持久化
#[derive(Debug)]
pub struct ExtractSlides {
    pub file_bytes: Vec<u8>,
}
