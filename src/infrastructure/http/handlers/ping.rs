//! 健康检查
//!
//! 返回统一响应信封，部署后用于连通性确认与版本核对

use axum::Json;
use serde::Serialize;

use crate::infrastructure::http::dto::ApiResponse;

/// 服务标识与版本号
#[derive(Debug, Serialize)]
pub struct PingData {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/ping
pub async fn ping() -> Json<ApiResponse<PingData>> {
    Json(ApiResponse::success(PingData {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_envelope_carries_version() {
        let Json(resp) = ping().await;
        assert_eq!(resp.errno, 0);
        assert!(resp.error.is_empty());
        let data = resp.data.unwrap();
        assert_eq!(data.status, "ok");
        assert_eq!(data.version, env!("CARGO_PKG_VERSION"));
    }
}
