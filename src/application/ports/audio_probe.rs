//! Audio Probe Port - 参考音频校验与时长探测
//!
//! 注册时验证负载是可解码的音频流并计算时长，具体实现在
//! infrastructure/adapters/audio 层（symphonia）

use thiserror::Error;

/// 探测错误
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Undecodable audio stream: {0}")]
    Undecodable(String),

    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),
}

/// 探测结果
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// 音频时长（秒），≥ 0
    pub duration_seconds: f64,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

/// Audio Probe Port
///
/// 纯函数式接口，不持有状态
pub trait AudioProbePort: Send + Sync {
    /// 解码校验并返回音频元数据
    fn probe(&self, data: &[u8]) -> Result<AudioInfo, ProbeError>;
}
