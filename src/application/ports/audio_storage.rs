//! Audio Storage Port - 出站端口
//!
//! 定义参考音频与合成产物的文件存储抽象

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::voice::AudioFormat;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port - 出站端口
///
/// 管理两类文件:
/// - 参考音频（voices 目录，样本注册表独占持有，写入后不可变）
/// - 合成产物（artifacts 目录，任务独占持有）
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 保存参考音频，返回文件路径
    async fn save_voice_sample(
        &self,
        sample_id: &str,
        format: AudioFormat,
        data: &[u8],
    ) -> Result<PathBuf, AudioStorageError>;

    /// 删除参考音频
    async fn delete_voice_sample(&self, path: &PathBuf) -> Result<(), AudioStorageError>;

    /// 保存合成产物，返回产物文件名（形如 `{task_id}.wav`）
    ///
    /// 写入必须原子：先写临时文件再 rename，
    /// 调用方在本方法成功返回后才允许将任务标记为 completed
    async fn save_artifact(
        &self,
        task_id: &str,
        data: &[u8],
    ) -> Result<String, AudioStorageError>;

    /// 产物文件的完整路径
    fn artifact_path(&self, filename: &str) -> PathBuf;

    /// 读取合成产物
    async fn read_artifact(&self, filename: &str) -> Result<Vec<u8>, AudioStorageError>;

    /// 删除合成产物（文件不存在视为成功）
    async fn delete_artifact(&self, filename: &str) -> Result<(), AudioStorageError>;
}
