//! Lector - 课程讲稿语音合成系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色样本上下文
//! - Task Context: 文本任务上下文
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, AudioStorage, AudioProbe, SlideExtractor, Repositories）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: TTS Client, Symphonia 音频探测, PPTX 解析, 文件存储
//! - Synthesis: 合成引擎（任务状态机 + 并发控制）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
