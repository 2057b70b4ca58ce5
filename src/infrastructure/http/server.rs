//! HTTP 服务入口
//!
//! 组装路由树、中间件与跨域策略，绑定端口后一直服务到关闭信号到来。
//! 上传体积上限来自存储配置，作用于整个路由树。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 监听地址与请求体上限
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传请求体大小上限（字节）
    pub max_upload_size: u64,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, max_upload_size: u64) -> Self {
        Self {
            host: host.into(),
            port,
            max_upload_size,
        }
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器，持有共享状态；路由树在启动时组装一次
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 绑定端口并服务请求，`shutdown` 完成后优雅退出
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr();
        let router = self.into_router();

        let listener = TcpListener::bind(&addr).await?;
        info!("HTTP server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    fn into_router(self) -> Router {
        // 浏览器端调用不限来源；预检结果缓存一小时
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(self.config.max_upload_size as usize))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state)
    }
}
