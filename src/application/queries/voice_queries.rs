//! Voice Queries

/// 列出所有声音样本查询
#[derive(Debug, Clone)]
pub struct ListVoices;
