//! Application State
//!
//! 包含所有 Command/Query Handlers 以及合成引擎的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    DeleteTaskHandler, DeleteVoiceHandler, RegisterVoiceHandler, SubmitTaskHandler,
    // Query handlers
    ExtractSlidesHandler, GetArtifactHandler, GetTaskHandler, ListTasksHandler, ListVoicesHandler,
    // Ports
    AudioProbePort, AudioStoragePort, SlideExtractorPort, TaskRepositoryPort, VoiceRepositoryPort,
};
use crate::infrastructure::synthesis::SynthesisEngine;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub voice_repo: Arc<dyn VoiceRepositoryPort>,
    pub task_repo: Arc<dyn TaskRepositoryPort>,
    pub storage: Arc<dyn AudioStoragePort>,

    // ========== 合成引擎 ==========
    pub synthesis_engine: Arc<SynthesisEngine>,

    // ========== Command Handlers ==========
    pub register_voice_handler: RegisterVoiceHandler,
    pub delete_voice_handler: DeleteVoiceHandler,
    pub submit_task_handler: SubmitTaskHandler,
    pub delete_task_handler: DeleteTaskHandler,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
    pub list_tasks_handler: ListTasksHandler,
    pub get_task_handler: GetTaskHandler,
    pub get_artifact_handler: GetArtifactHandler,
    pub extract_slides_handler: ExtractSlidesHandler,
}

/// AppState 构建参数中的业务限制
#[derive(Debug, Clone)]
pub struct StateLimits {
    pub min_voice_duration_secs: f64,
    pub max_voice_duration_secs: f64,
    pub min_text_chars: usize,
    pub max_text_chars: usize,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        task_repo: Arc<dyn TaskRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
        probe: Arc<dyn AudioProbePort>,
        extractor: Arc<dyn SlideExtractorPort>,
        synthesis_engine: Arc<SynthesisEngine>,
        limits: StateLimits,
    ) -> Self {
        Self {
            voice_repo: voice_repo.clone(),
            task_repo: task_repo.clone(),
            storage: storage.clone(),
            synthesis_engine,

            // Command handlers
            register_voice_handler: RegisterVoiceHandler::new(
                voice_repo.clone(),
                storage.clone(),
                probe,
                limits.min_voice_duration_secs,
                limits.max_voice_duration_secs,
            ),
            delete_voice_handler: DeleteVoiceHandler::new(voice_repo.clone(), storage.clone()),
            submit_task_handler: SubmitTaskHandler::new(
                task_repo.clone(),
                voice_repo.clone(),
                limits.min_text_chars,
                limits.max_text_chars,
            ),
            delete_task_handler: DeleteTaskHandler::new(task_repo.clone(), storage.clone()),

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(voice_repo),
            list_tasks_handler: ListTasksHandler::new(task_repo.clone()),
            get_task_handler: GetTaskHandler::new(task_repo.clone()),
            get_artifact_handler: GetArtifactHandler::new(task_repo, storage),
            extract_slides_handler: ExtractSlidesHandler::new(extractor),
        }
    }
}
