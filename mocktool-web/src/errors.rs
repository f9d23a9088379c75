//! Web-specific error type and its HTTP rendering
//!
//! Every error leaving a handler is rendered as the mocktool error body:
//! `success`, `http_status`, `grpc_code`, `error_code`, `error_message`,
//! `details` and a `trace_id` that also appears in `details["x-trace-id"]`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mocktool_core::error::TRACE_ID_KEY;
use mocktool_core::{ErrorResponse, MockError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Error type for HTTP handlers
#[derive(Debug, Error)]
pub enum WebError {
    /// Resolver error, rendered with its own status and codes
    #[error(transparent)]
    Mock(#[from] MockError),

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },

    #[error("{message}")]
    ServiceUnavailable { message: String },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Mock(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            WebError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            WebError::NotFound { .. } => StatusCode::NOT_FOUND,
            WebError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// gRPC status code equivalent
    pub fn grpc_code(&self) -> i32 {
        match self {
            WebError::Mock(err) => err.grpc_code(),
            WebError::BadRequest { .. } => 3,
            WebError::NotFound { .. } => 5,
            WebError::ServiceUnavailable { .. } => 14,
            WebError::Internal { .. } => 13,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            WebError::Mock(err) => err.error_code(),
            WebError::BadRequest { .. } => "BAD_REQUEST",
            WebError::NotFound { .. } => "NOT_FOUND",
            WebError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            WebError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Client-facing body with a trace id
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            WebError::Mock(err) => ErrorResponse::from(err),
            _ => {
                let details = BTreeMap::from([(
                    TRACE_ID_KEY.to_string(),
                    uuid::Uuid::new_v4().to_string(),
                )]);
                ErrorResponse::from_parts(
                    self.status_code().as_u16(),
                    self.grpc_code(),
                    self.error_code(),
                    self.to_string(),
                    details,
                )
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_error_response();

        if status.is_server_error() {
            error!(
                trace_id = %body.trace_id,
                error_code = %body.error_code,
                "Request failed: {}",
                body.error_message
            );
        }

        (status, Json(body)).into_response()
    }
}

// Common error constructors
impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        WebError::ServiceUnavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: WebError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_mock_not_found_keeps_its_trace_id() {
        let err = MockError::mock_not_found();
        let trace_id = err.trace_id().unwrap().to_string();

        let (status, body) = render(WebError::from(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert_eq!(body.grpc_code, 13);
        assert_eq!(body.error_code, "ERR.001");
        assert_eq!(body.error_message, "Mock API not found");
        assert_eq!(body.trace_id, trace_id);
        assert_eq!(body.details[TRACE_ID_KEY], trace_id);
    }

    #[tokio::test]
    async fn test_web_errors_render_error_shape() {
        let (status, body) = render(WebError::bad_request("invalid scenario_id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.http_status, 400);
        assert_eq!(body.grpc_code, 3);
        assert_eq!(body.error_message, "invalid scenario_id");
        assert!(!body.trace_id.is_empty());
        assert_eq!(body.details[TRACE_ID_KEY], body.trace_id);

        let (status, body) = render(WebError::not_found("scenario not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error_code, "NOT_FOUND");

        let (status, _) = render(WebError::service_unavailable("down")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_status_mapping_follows_mock_error() {
        let err = WebError::from(MockError::no_active_scenario("svc"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.grpc_code(), 5);
        assert_eq!(err.error_code(), "NO_ACTIVE_SCENARIO");
        assert_eq!(err.to_string(), "no active scenario for feature 'svc'");
    }

    #[tokio::test]
    async fn test_upstream_unavailable_renders_503() {
        let (status, body) = render(WebError::from(MockError::unavailable("upstream down"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.http_status, 503);
        assert_eq!(body.grpc_code, 14);
        assert_eq!(body.error_code, "SERVICE_UNAVAILABLE");
        assert_eq!(body.error_message, "upstream down");
    }
}
