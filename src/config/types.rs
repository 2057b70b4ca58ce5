//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 音色样本配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 文本任务配置
    #[serde(default)]
    pub task: TaskConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            tts: TtsConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            voice: VoiceConfig::default(),
            task: TaskConfig::default(),
            synthesis: SynthesisConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（供 TTS 服务回读音色参考音频）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// HTTP 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    300
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/lector.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音色参考音频存储目录
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// 合成产物存储目录
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 20MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_voices_dir() -> PathBuf {
    PathBuf::from("data/voices")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

fn default_max_upload_size() -> u64 {
    20 * 1024 * 1024 // 20 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            voices_dir: default_voices_dir(),
            artifacts_dir: default_artifacts_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 音色样本配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// 参考音频最短时长（秒）
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: f64,

    /// 参考音频最长时长（秒）
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f64,
}

fn default_min_duration() -> f64 {
    5.0
}

fn default_max_duration() -> f64 {
    30.0
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration(),
            max_duration_secs: default_max_duration(),
        }
    }
}

/// 文本任务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// 任务文本最小长度（字符数）
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// 任务文本最大长度（字符数）
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_min_text_chars() -> usize {
    800
}

fn default_max_text_chars() -> usize {
    2000
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 最大并发合成数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 单次合成超时时间（秒），0 表示不限时
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_synthesis_timeout() -> u64 {
    600
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_synthesis_timeout(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
