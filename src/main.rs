//! Lector - 课程讲稿语音合成系统
//!
//! - Domain: voice/, task/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, adapters, synthesis

use std::sync::Arc;
use std::time::Duration;

use lector::application::{TaskRepositoryPort, TtsEnginePort};
use lector::config::{load_config, print_config};
use lector::infrastructure::adapters::{
    FileAudioStorage, HttpTtsClient, HttpTtsClientConfig, PptxSlideExtractor, SymphoniaAudioProbe,
};
use lector::infrastructure::http::{AppState, HttpServer, ServerConfig, StateLimits};
use lector::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteTaskRepository, SqliteVoiceRepository,
};
use lector::infrastructure::synthesis::{SynthesisEngine, SynthesisEngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},lector={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Lector - 课程讲稿语音合成系统");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let voice_repo = Arc::new(SqliteVoiceRepository::new(pool.clone()));
    let task_repo = Arc::new(SqliteTaskRepository::new(pool));

    // 启动恢复：上次运行崩溃遗留的 processing 任务重置为 pending
    let reset = task_repo.reset_stale_processing().await?;
    if reset > 0 {
        tracing::warn!(count = reset, "Reset stale processing tasks to pending");
    }

    // 文件存储（参考音频 + 合成产物）
    let storage = Arc::new(
        FileAudioStorage::new(&config.storage.voices_dir, &config.storage.artifacts_dir).await?,
    );

    // 音频探测与 PPTX 解析适配器
    let probe = Arc::new(SymphoniaAudioProbe::new());
    let extractor = Arc::new(PptxSlideExtractor::new());

    // 创建 HTTP TTS 引擎
    let tts_config = HttpTtsClientConfig {
        base_url: config.tts.url.clone(),
        timeout_secs: config.tts.timeout_secs,
    };
    let tts_engine = Arc::new(HttpTtsClient::new(tts_config)?);

    // TTS 服务连通性预检，不可达仅告警，不阻塞启动
    if !tts_engine.health_check().await {
        tracing::warn!(url = %config.tts.url, "TTS service unreachable at startup");
    }

    // 创建合成引擎
    let engine_config = SynthesisEngineConfig {
        max_concurrent: config.synthesis.max_concurrent,
        timeout: match config.synthesis.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
        base_url: config.server.public_base_url(),
    };
    let synthesis_engine = Arc::new(SynthesisEngine::new(
        engine_config,
        task_repo.clone(),
        voice_repo.clone(),
        storage.clone(),
        tts_engine,
    ));

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size,
    );
    let state = AppState::new(
        voice_repo,
        task_repo,
        storage,
        probe,
        extractor,
        synthesis_engine,
        StateLimits {
            min_voice_duration_secs: config.voice.min_duration_secs,
            max_voice_duration_secs: config.voice.max_duration_secs,
            min_text_chars: config.task.min_text_chars,
            max_text_chars: config.task.max_text_chars,
        },
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::error!("Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
