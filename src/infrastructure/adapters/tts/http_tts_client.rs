//! HTTP TTS Client - 调用外部语音克隆合成服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize
//! Request: {"text": "...", "voice_ref": "http://..."}  (JSON)
//! Response: audio/wav binary, metadata in headers

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest {
    /// 要合成的文本
    text: String,
    /// 参考音频的 URL（TTS 服务自行下载并缓存）
    voice_ref: String,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let http_request = TtsHttpRequest {
            text: request.text,
            voice_ref: request.voice_ref,
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = http_request.text.len(),
            voice_id = %request.voice_id,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(&self.synthesize_url())
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // 从 headers 提取元数据
        let headers = response.headers();
        let duration_ms = headers
            .get("X-TTS-Duration-Ms")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let sample_rate = headers
            .get("X-TTS-Sample-Rate")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse(
                "TTS service returned empty audio".to_string(),
            ));
        }

        tracing::info!(
            voice_id = %request.voice_id,
            audio_bytes = audio_data.len(),
            duration_ms = ?duration_ms,
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            audio_data,
            duration_ms,
            sample_rate,
        })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(&self.health_url()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
