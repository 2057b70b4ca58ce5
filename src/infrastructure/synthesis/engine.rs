//! Synthesis Engine - 合成任务状态机
//!
//! 每个 task_id 至多一个在途生成（in-flight 守卫，second caller 快速失败
//! 返回 TaskBusy）；不同任务并发执行，全局并发由 semaphore 限制。
//! 产物写入（临时文件 + rename）先于 completed 状态写入，
//! 任务不可能被观察到 completed 而产物缺失

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, SynthesisRequest, TaskRepositoryPort, TtsEnginePort, VoiceRepositoryPort,
};
use crate::domain::task::TaskStatus;

/// 引擎配置
#[derive(Debug, Clone)]
pub struct SynthesisEngineConfig {
    /// 最大并发合成数（模型运行时受 CPU/加速器约束）
    pub max_concurrent: usize,
    /// 单次合成超时；None 为不限时
    pub timeout: Option<Duration>,
    /// 本服务的公开 Base URL（供 TTS 服务下载 voice reference）
    pub base_url: String,
}

impl Default for SynthesisEngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            timeout: None,
            base_url: "http://localhost:5060".to_string(),
        }
    }
}

/// 生成结果
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub task_id: String,
    /// 产物文件名
    pub output_audio: String,
    /// 下载路径
    pub download_url: String,
}

/// 同一 task_id 的 in-flight 守卫，Drop 时释放
struct InFlightGuard {
    in_flight: Arc<DashMap<String, ()>>,
    task_id: String,
}

impl InFlightGuard {
    fn try_acquire(in_flight: &Arc<DashMap<String, ()>>, task_id: &str) -> Option<Self> {
        use dashmap::mapref::entry::Entry;
        match in_flight.entry(task_id.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self {
                    in_flight: in_flight.clone(),
                    task_id: task_id.to_string(),
                })
            }
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.task_id);
    }
}

/// 合成引擎
pub struct SynthesisEngine {
    config: SynthesisEngineConfig,
    task_repo: Arc<dyn TaskRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    in_flight: Arc<DashMap<String, ()>>,
    semaphore: Arc<Semaphore>,
}

impl SynthesisEngine {
    pub fn new(
        config: SynthesisEngineConfig,
        task_repo: Arc<dyn TaskRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            config,
            task_repo,
            voice_repo,
            storage,
            tts_engine,
            in_flight: Arc::new(DashMap::new()),
            semaphore,
        }
    }

    fn outcome(task_id: &str, output_audio: String) -> GenerateOutcome {
        GenerateOutcome {
            task_id: task_id.to_string(),
            download_url: format!("/api/audio/{}", task_id),
            output_audio,
        }
    }

    /// 触发一次生成
    ///
    /// - completed 任务直接返回既有产物引用，不重新计算（成功幂等）
    /// - failed 任务从等价于 pending 的语义重试（显式恢复，不自动重试）
    /// - 同一 task_id 已有在途生成时快速失败 TaskBusy
    pub async fn generate(&self, task_id: &str) -> Result<GenerateOutcome, ApplicationError> {
        // 快路径：成功幂等，不占用 in-flight 守卫
        let task = self
            .task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Task", task_id))?;
        if task.status == TaskStatus::Completed {
            let output = task
                .output_audio
                .ok_or_else(|| ApplicationError::internal("completed task missing output_audio"))?;
            return Ok(Self::outcome(task_id, output));
        }

        let _guard = InFlightGuard::try_acquire(&self.in_flight, task_id)
            .ok_or_else(|| ApplicationError::TaskBusy(task_id.to_string()))?;

        // 守卫获取后重读：竞争窗口内别的调用可能已完成该任务
        let task = self
            .task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Task", task_id))?;
        if task.status == TaskStatus::Completed {
            let output = task
                .output_audio
                .ok_or_else(|| ApplicationError::internal("completed task missing output_audio"))?;
            return Ok(Self::outcome(task_id, output));
        }
        // pending 与 failed 都允许进入 processing；守卫在手却读到
        // processing 只能是崩溃遗留（启动恢复未跑），拒绝
        if !task.status.can_transition_to(TaskStatus::Processing) {
            return Err(ApplicationError::TaskBusy(task_id.to_string()));
        }

        // 等待全局并发额度；排队期间任务保持 pending
        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ApplicationError::internal("synthesis semaphore closed"))?;

        // 生成时重新校验样本引用（提交后样本可能已被删除）；
        // 该检查先于 processing 转移，失败时任务记录不被触及
        let voice = self
            .voice_repo
            .find_by_id(&task.voice_id)
            .await?
            .ok_or_else(|| ApplicationError::UnknownVoice(task.voice_id.clone()))?;

        self.task_repo.mark_processing(task_id).await?;
        tracing::info!(task_id = %task_id, voice_id = %voice.id, "Synthesis started");

        let request = SynthesisRequest {
            text: task.text.clone(),
            voice_ref: format!("{}/api/voice/audio/{}", self.config.base_url, voice.id),
            voice_id: voice.id.clone(),
        };

        let result = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.tts_engine.synthesize(request)).await {
                Ok(inner) => inner.map_err(ApplicationError::from),
                Err(_) => Err(ApplicationError::Timeout),
            },
            None => self
                .tts_engine
                .synthesize(request)
                .await
                .map_err(ApplicationError::from),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => return self.fail_task(task_id, e).await,
        };

        // 产物先落盘再进终态
        let output_audio = match self.storage.save_artifact(task_id, &response.audio_data).await {
            Ok(filename) => filename,
            Err(e) => return self.fail_task(task_id, e.into()).await,
        };

        self.task_repo.mark_completed(task_id, &output_audio).await?;

        tracing::info!(
            task_id = %task_id,
            output_audio = %output_audio,
            duration_ms = ?response.duration_ms,
            "Synthesis completed"
        );

        Ok(Self::outcome(task_id, output_audio))
    }

    /// 记录失败并把错误返回给等待方；任务保持可重试
    async fn fail_task(
        &self,
        task_id: &str,
        error: ApplicationError,
    ) -> Result<GenerateOutcome, ApplicationError> {
        tracing::error!(task_id = %task_id, error = %error, "Synthesis failed");

        if let Err(mark_err) = self.task_repo.mark_failed(task_id, &error.to_string()).await {
            tracing::error!(
                task_id = %task_id,
                error = %mark_err,
                "Failed to record task failure"
            );
        }

        Err(error)
    }
}
