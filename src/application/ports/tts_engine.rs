//! TTS Engine Port - 语音合成模型抽象
//!
//! 定义对底层语音克隆合成模型的抽象接口，
//! 具体实现在 infrastructure/adapters/tts 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的课文文本
    pub text: String,
    /// 参考音频的 URL 或路径（TTS 服务自行下载/读取）
    pub voice_ref: String,
    /// 样本 ID（用于日志和追踪）
    pub voice_id: String,
}

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// 完整音频数据（WAV）
    pub audio_data: Vec<u8>,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
    /// 采样率
    pub sample_rate: Option<u32>,
}

/// TTS Engine Port
///
/// 一次调用产出一个完整音频，无流式输出
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行合成
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
