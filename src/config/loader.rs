//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `LECTOR_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `LECTOR_SERVER__HOST=127.0.0.1`
/// - `LECTOR_SERVER__PORT=8080`
/// - `LECTOR_TTS__URL=http://tts-server:8000`
/// - `LECTOR_DATABASE__PATH=/data/lector.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 300)?
        .set_default("database.path", "data/lector.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.voices_dir", "data/voices")?
        .set_default("storage.artifacts_dir", "data/audio")?
        .set_default("storage.max_upload_size", 20 * 1024 * 1024)?
        .set_default("voice.min_duration_secs", 5.0)?
        .set_default("voice.max_duration_secs", 30.0)?
        .set_default("task.min_text_chars", 800)?
        .set_default("task.max_text_chars", 2000)?
        .set_default("synthesis.max_concurrent", 2)?
        .set_default("synthesis.timeout_secs", 600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: LECTOR_
    // 层级分隔符: __ (双下划线)
    // 例如: LECTOR_TTS__URL=http://tts-server:8000
    builder = builder.add_source(
        Environment::with_prefix("LECTOR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.task.min_text_chars == 0 || config.task.min_text_chars > config.task.max_text_chars {
        return Err(ConfigError::ValidationError(format!(
            "Invalid task text bounds: min={} max={}",
            config.task.min_text_chars, config.task.max_text_chars
        )));
    }

    if config.voice.min_duration_secs <= 0.0
        || config.voice.min_duration_secs > config.voice.max_duration_secs
    {
        return Err(ConfigError::ValidationError(format!(
            "Invalid voice duration bounds: min={} max={}",
            config.voice.min_duration_secs, config.voice.max_duration_secs
        )));
    }

    if config.synthesis.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Synthesis max_concurrent cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        "Database Max Connections: {}",
        config.database.max_connections
    );
    tracing::info!("Voices Directory: {:?}", config.storage.voices_dir);
    tracing::info!("Artifacts Directory: {:?}", config.storage.artifacts_dir);
    tracing::info!(
        "Voice Duration Window: {}s - {}s",
        config.voice.min_duration_secs,
        config.voice.max_duration_secs
    );
    tracing::info!(
        "Task Text Window: {} - {} chars",
        config.task.min_text_chars,
        config.task.max_text_chars
    );
    tracing::info!("Synthesis Concurrency: {}", config.synthesis.max_concurrent);
    tracing::info!("Synthesis Timeout: {}s", config.synthesis.timeout_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_inverted_text_bounds() {
        let mut config = AppConfig::default();
        config.task.min_text_chars = 3000;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_inverted_duration_bounds() {
        let mut config = AppConfig::default();
        config.voice.min_duration_secs = 60.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_concurrency() {
        let mut config = AppConfig::default();
        config.synthesis.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }
}
