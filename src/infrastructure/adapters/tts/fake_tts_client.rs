//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 不调用任何外部服务，返回内存生成的静音 WAV；
//! 可配置固定延迟与强制失败，用于引擎并发/失败路径测试

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 生成音频的时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 每次调用前的模拟推理延迟
    pub delay: Duration,
    /// 强制失败并返回该错误信息
    pub fail_with: Option<String>,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            sample_rate: 16000,
            delay: Duration::from_millis(10),
            fail_with: None,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 已处理的调用次数
    calls: AtomicUsize,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 生成 PCM16 单声道静音 WAV
    pub fn silent_wav(sample_rate: u32, duration_ms: u64) -> Vec<u8> {
        let num_samples = (sample_rate as u64 * duration_ms / 1000) as u32;
        let data_size = num_samples * 2;
        let mut wav = Vec::with_capacity(44 + data_size as usize);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());
        wav.resize(44 + data_size as usize, 0);
        wav
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            "FakeTtsClient: synthesizing"
        );

        tokio::time::sleep(self.config.delay).await;

        if let Some(msg) = &self.config.fail_with {
            return Err(TtsError::ServiceError(msg.clone()));
        }

        Ok(SynthesisResponse {
            audio_data: Self::silent_wav(self.config.sample_rate, self.config.duration_ms),
            duration_ms: Some(self.config.duration_ms),
            sample_rate: Some(self.config.sample_rate),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
