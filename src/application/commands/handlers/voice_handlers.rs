//! Voice Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{DeleteVoice, RegisterVoice};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioProbePort, AudioStoragePort, VoiceRecord, VoiceRepositoryPort,
};
use crate::domain::voice::SampleId;

// ============================================================================
// RegisterVoice
// ============================================================================

/// 注册样本响应
#[derive(Debug, Clone)]
pub struct RegisterVoiceResponse {
    pub id: String,
    pub duration_seconds: f64,
}

/// RegisterVoice Handler
///
/// 校验顺序: 空负载 → 可解码 → 时长窗口 → ID 冲突。
/// 任何一步失败都不落任何记录
pub struct RegisterVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
    probe: Arc<dyn AudioProbePort>,
    /// 参考音频允许的时长窗口（秒）
    min_duration_secs: f64,
    max_duration_secs: f64,
}

impl RegisterVoiceHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
        probe: Arc<dyn AudioProbePort>,
        min_duration_secs: f64,
        max_duration_secs: f64,
    ) -> Self {
        Self {
            voice_repo,
            storage,
            probe,
            min_duration_secs,
            max_duration_secs,
        }
    }

    pub async fn handle(
        &self,
        command: RegisterVoice,
    ) -> Result<RegisterVoiceResponse, ApplicationError> {
        if command.audio_bytes.is_empty() {
            return Err(ApplicationError::EmptyPayload);
        }

        // 解码校验 + 时长探测
        let info = self.probe.probe(&command.audio_bytes)?;
        if info.duration_seconds < self.min_duration_secs
            || info.duration_seconds > self.max_duration_secs
        {
            return Err(ApplicationError::InvalidAudio(format!(
                "reference duration {:.2}s outside allowed window {:.0}-{:.0}s",
                info.duration_seconds, self.min_duration_secs, self.max_duration_secs
            )));
        }

        let sample_id = match command.custom_id {
            Some(id) => {
                let id = SampleId::custom(id)?;
                if self.voice_repo.find_by_id(id.as_str()).await?.is_some() {
                    return Err(ApplicationError::DuplicateId(id.into_string()));
                }
                id
            }
            None => SampleId::generate(),
        };

        // 先落文件再落记录；记录写入失败时回收文件，避免孤儿
        let audio_path = self
            .storage
            .save_voice_sample(sample_id.as_str(), command.format, &command.audio_bytes)
            .await?;

        let record = VoiceRecord {
            id: sample_id.as_str().to_string(),
            audio_path: audio_path.clone(),
            duration_seconds: info.duration_seconds,
            created_at: Utc::now(),
        };

        if let Err(e) = self.voice_repo.insert(&record).await {
            if let Err(cleanup_err) = self.storage.delete_voice_sample(&audio_path).await {
                tracing::warn!(
                    voice_id = %sample_id,
                    error = %cleanup_err,
                    "Failed to clean up orphan sample file"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            voice_id = %sample_id,
            duration_seconds = info.duration_seconds,
            "Voice sample registered"
        );

        Ok(RegisterVoiceResponse {
            id: record.id,
            duration_seconds: record.duration_seconds,
        })
    }
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler
///
/// 任务对样本是弱引用，删除样本不触及任何任务记录；
/// 引用该样本的任务之后在生成阶段以 UnknownVoice 失败
pub struct DeleteVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteVoiceHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            voice_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let voice = self
            .voice_repo
            .find_by_id(&command.voice_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Voice", &command.voice_id))?;

        self.voice_repo.delete(&voice.id).await?;

        // 文件删除失败只告警，记录已不可达
        if let Err(e) = self.storage.delete_voice_sample(&voice.audio_path).await {
            tracing::warn!(voice_id = %voice.id, error = %e, "Failed to delete sample file");
        }

        tracing::info!(voice_id = %voice.id, "Voice sample deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AudioInfo, AudioStorageError, ProbeError, RepositoryError,
    };
    use crate::domain::voice::AudioFormat;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct MemVoiceRepo {
        voices: Mutex<HashMap<String, VoiceRecord>>,
    }

    impl MemVoiceRepo {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                voices: Mutex::new(HashMap::new()),
            })
        }
    }

    #[async_trait]
    impl VoiceRepositoryPort for MemVoiceRepo {
        async fn insert(&self, voice: &VoiceRecord) -> Result<(), RepositoryError> {
            let mut voices = self.voices.lock().unwrap();
            if voices.contains_key(&voice.id) {
                return Err(RepositoryError::Duplicate(voice.id.clone()));
            }
            voices.insert(voice.id.clone(), voice.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<VoiceRecord>, RepositoryError> {
            Ok(self.voices.lock().unwrap().get(id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<VoiceRecord>, RepositoryError> {
            let mut all: Vec<_> = self.voices.lock().unwrap().values().cloned().collect();
            all.sort_by_key(|v| v.created_at);
            Ok(all)
        }

        async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
            self.voices.lock().unwrap().remove(id);
            Ok(())
        }
    }

    struct MemStorage;

    #[async_trait]
    impl AudioStoragePort for MemStorage {
        async fn save_voice_sample(
            &self,
            sample_id: &str,
            format: AudioFormat,
            _data: &[u8],
        ) -> Result<PathBuf, AudioStorageError> {
            Ok(PathBuf::from(format!("/tmp/{}.{}", sample_id, format.extension())))
        }

        async fn delete_voice_sample(&self, _path: &PathBuf) -> Result<(), AudioStorageError> {
            Ok(())
        }

        async fn save_artifact(
            &self,
            task_id: &str,
            _data: &[u8],
        ) -> Result<String, AudioStorageError> {
            Ok(format!("{}.wav", task_id))
        }

        fn artifact_path(&self, filename: &str) -> PathBuf {
            PathBuf::from(format!("/tmp/{}", filename))
        }

        async fn read_artifact(&self, _filename: &str) -> Result<Vec<u8>, AudioStorageError> {
            Ok(Vec::new())
        }

        async fn delete_artifact(&self, _filename: &str) -> Result<(), AudioStorageError> {
            Ok(())
        }
    }

    struct FixedProbe {
        duration: f64,
        fail: bool,
    }

    impl AudioProbePort for FixedProbe {
        fn probe(&self, _data: &[u8]) -> Result<AudioInfo, ProbeError> {
            if self.fail {
                return Err(ProbeError::Undecodable("not audio".into()));
            }
            Ok(AudioInfo {
                duration_seconds: self.duration,
                sample_rate: Some(16000),
                channels: Some(1),
            })
        }
    }

    fn handler(repo: Arc<MemVoiceRepo>, duration: f64, fail: bool) -> RegisterVoiceHandler {
        RegisterVoiceHandler::new(
            repo,
            Arc::new(MemStorage),
            Arc::new(FixedProbe { duration, fail }),
            5.0,
            30.0,
        )
    }

    fn register_cmd(id: Option<&str>) -> RegisterVoice {
        RegisterVoice {
            audio_bytes: vec![0u8; 128],
            format: AudioFormat::Wav,
            custom_id: id.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_register_with_generated_id() {
        let repo = MemVoiceRepo::new();
        let resp = handler(repo.clone(), 10.0, false)
            .handle(register_cmd(None))
            .await
            .unwrap();
        assert!((resp.duration_seconds - 10.0).abs() < f64::EPSILON);
        assert!(repo.find_by_id(&resp.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_empty_payload_rejected() {
        let repo = MemVoiceRepo::new();
        let cmd = RegisterVoice {
            audio_bytes: Vec::new(),
            format: AudioFormat::Wav,
            custom_id: None,
        };
        let err = handler(repo.clone(), 10.0, false).handle(cmd).await.unwrap_err();
        assert!(matches!(err, ApplicationError::EmptyPayload));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_undecodable_rejected() {
        let repo = MemVoiceRepo::new();
        let err = handler(repo.clone(), 10.0, true)
            .handle(register_cmd(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidAudio(_)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_duration_window_enforced() {
        let repo = MemVoiceRepo::new();
        let err = handler(repo.clone(), 3.0, false)
            .handle(register_cmd(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidAudio(_)));

        let err = handler(repo.clone(), 31.0, false)
            .handle(register_cmd(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidAudio(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_custom_id_keeps_original() {
        let repo = MemVoiceRepo::new();
        let h = handler(repo.clone(), 10.0, false);
        h.handle(register_cmd(Some("teacher-01"))).await.unwrap();
        let original = repo.find_by_id("teacher-01").await.unwrap().unwrap();

        let h2 = handler(repo.clone(), 20.0, false);
        let err = h2.handle(register_cmd(Some("teacher-01"))).await.unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateId(_)));

        // 原样本未被覆盖
        let kept = repo.find_by_id("teacher-01").await.unwrap().unwrap();
        assert_eq!(kept.duration_seconds, original.duration_seconds);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_invalid_custom_id() {
        let repo = MemVoiceRepo::new();
        let err = handler(repo.clone(), 10.0, false)
            .handle(register_cmd(Some("bad id!")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_delete_voice_not_found() {
        let repo = MemVoiceRepo::new();
        let h = DeleteVoiceHandler::new(repo, Arc::new(MemStorage));
        let err = h
            .handle(DeleteVoice {
                voice_id: "missing".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
