//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、Repository、AudioStorage、AudioProbe、SlideExtractor）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        DeleteTaskHandler, DeleteVoiceHandler, RegisterVoiceHandler, RegisterVoiceResponse,
        SubmitTaskHandler, SubmitTaskResponse,
    },
    DeleteTask, DeleteVoice, RegisterVoice, SubmitTask,
};

pub use error::ApplicationError;

pub use ports::{
    // Audio probe
    AudioInfo,
    AudioProbePort,
    ProbeError,
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    // Slide extractor
    ExtractError,
    SlideExtractorPort,
    // Repositories
    RepositoryError,
    TaskRecord,
    TaskRepositoryPort,
    VoiceRecord,
    VoiceRepositoryPort,
    // TTS engine
    SynthesisRequest,
    SynthesisResponse,
    TtsEnginePort,
    TtsError,
};

pub use queries::{
    handlers::{
        ArtifactFile, ExtractSlidesHandler, ExtractSlidesResponse, GetArtifactHandler,
        GetTaskHandler, ListTasksHandler, ListVoicesHandler, TaskSummary, VoiceSummary,
    },
    ExtractSlides, GetArtifact, GetTask, ListTasks, ListVoices,
};
