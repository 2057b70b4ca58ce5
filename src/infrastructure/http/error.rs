//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    ServiceUnavailable(String),
    Timeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 业务错误统一以 HTTP 200 + errno 返回，客户端只看 errno
        let response = match &self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = errno::NOT_FOUND, error = %msg, "Resource not found");
                ErrorResponse::new(errno::NOT_FOUND, msg.clone())
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                ErrorResponse::new(errno::BAD_REQUEST, msg.clone())
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(errno = errno::CONFLICT, error = %msg, "Resource conflict");
                ErrorResponse::new(errno::CONFLICT, msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone())
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = errno::SERVICE_UNAVAILABLE, error = %msg, "Service unavailable");
                ErrorResponse::new(errno::SERVICE_UNAVAILABLE, msg.clone())
            }
            ApiError::Timeout(msg) => {
                tracing::error!(errno = errno::GATEWAY_TIMEOUT, error = %msg, "Synthesis timeout");
                ErrorResponse::new(errno::GATEWAY_TIMEOUT, msg.clone())
            }
        };

        (StatusCode::OK, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::EmptyPayload
            | ApplicationError::InvalidAudio(_)
            | ApplicationError::InvalidDocument(_)
            | ApplicationError::InvalidTextLength { .. }
            | ApplicationError::InvalidId(_) => ApiError::BadRequest(e.to_string()),
            ApplicationError::UnknownVoice(_) | ApplicationError::NotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            ApplicationError::DuplicateId(_) | ApplicationError::TaskBusy(_) => {
                ApiError::Conflict(e.to_string())
            }
            ApplicationError::Timeout => ApiError::Timeout(e.to_string()),
            ApplicationError::ModelFailure(_) => ApiError::ServiceUnavailable(e.to_string()),
            ApplicationError::RepositoryError(msg)
            | ApplicationError::StorageError(msg)
            | ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::new(404, "Task not found: t1")).unwrap();
        assert_eq!(body["errno"], 404);
        assert_eq!(body["error"], "Task not found: t1");
        assert!(body["data"].is_null());
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let e = ApiError::from(ApplicationError::EmptyPayload);
        assert!(matches!(e, ApiError::BadRequest(_)));

        let e = ApiError::from(ApplicationError::InvalidTextLength {
            actual: 10,
            min: 800,
            max: 2000,
        });
        assert!(matches!(e, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_unknown_voice_maps_to_not_found() {
        let e = ApiError::from(ApplicationError::UnknownVoice("v1".to_string()));
        assert!(matches!(e, ApiError::NotFound(_)));
    }

    #[test]
    fn test_conflicts_map_to_conflict() {
        let e = ApiError::from(ApplicationError::DuplicateId("t1".to_string()));
        assert!(matches!(e, ApiError::Conflict(_)));

        let e = ApiError::from(ApplicationError::TaskBusy("t1".to_string()));
        assert!(matches!(e, ApiError::Conflict(_)));
    }

    #[test]
    fn test_synthesis_errors_map_to_unavailable() {
        let e = ApiError::from(ApplicationError::Timeout);
        assert!(matches!(e, ApiError::Timeout(_)));

        let e = ApiError::from(ApplicationError::ModelFailure("boom".to_string()));
        assert!(matches!(e, ApiError::ServiceUnavailable(_)));
    }
}
