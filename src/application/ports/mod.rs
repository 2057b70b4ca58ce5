//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_probe;
mod audio_storage;
mod repositories;
mod slide_extractor;
mod tts_engine;

pub use audio_probe::{AudioInfo, AudioProbePort, ProbeError};
pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use repositories::{
    RepositoryError, TaskRecord, TaskRepositoryPort, VoiceRecord, VoiceRepositoryPort,
};
pub use slide_extractor::{ExtractError, SlideExtractorPort};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
