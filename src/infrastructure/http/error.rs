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
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    BadGateway(String),
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, i32, &str) {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, errno::BAD_REQUEST, msg.as_str())
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                errno::INTERNAL_ERROR,
                msg.as_str(),
            ),
            ApiError::BadGateway(msg) => {
                (StatusCode::BAD_GATEWAY, errno::BAD_GATEWAY, msg.as_str())
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                errno::SERVICE_UNAVAILABLE,
                msg.as_str(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, msg) = self.parts();

        if status.is_server_error() {
            tracing::error!(errno = code, error = %msg, "Request failed");
        } else {
            tracing::warn!(errno = code, error = %msg, "Bad request");
        }

        (status, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ExternalServiceError(msg) => ApiError::BadGateway(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<crate::domain::RequestError> for ApiError {
    fn from(e: crate::domain::RequestError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        let e: ApiError = ApplicationError::ExternalServiceError("timeout".into()).into();
        assert!(matches!(e, ApiError::BadGateway(_)));

        let e: ApiError = ApplicationError::StorageError("disk full".into()).into();
        assert!(matches!(e, ApiError::Internal(msg) if msg == "disk full"));

        let e: ApiError = crate::domain::RequestError::EmptyDescription.into();
        assert!(matches!(e, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_status_codes() {
        let response = ApiError::BadRequest("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::ServiceUnavailable("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
