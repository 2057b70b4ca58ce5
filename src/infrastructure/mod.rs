//! 基础设施层
//!
//! - http: RESTful API (axum)
//! - persistence: SQLite 存储
//! - adapters: TTS 客户端、音频探测、PPTX 解析、文件存储
//! - synthesis: 合成引擎（任务状态机）

pub mod adapters;
pub mod http;
pub mod persistence;
pub mod synthesis;
