//! Error taxonomy surfaced by the mock resolver

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for resolver operations
pub type MockResult<T> = Result<T, MockError>;

/// Detail key carrying the trace id of a surfaced error
pub const TRACE_ID_KEY: &str = "x-trace-id";

/// Error code reported when no stored mock matches a request
pub const MOCK_NOT_FOUND_CODE: &str = "ERR.001";

/// Errors surfaced to forwarding clients
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MockError {
    /// Missing header, invalid body or unparseable parameter
    #[error("{message}")]
    BadRequest { message: String },

    /// No active mock record matches the request fingerprint
    #[error("Mock API not found")]
    MockNotFound { trace_id: String },

    /// Neither an account-specific nor a global scenario is active
    #[error("no active scenario for feature '{feature}'")]
    NoActiveScenario { feature: String },

    /// Decode, encode or unexpected storage failure
    #[error("{message}")]
    Internal { message: String },

    /// Upstream transport failure; reserved for forwarders that proxy to a
    /// real backend, the mock resolver itself never produces it
    #[error("{message}")]
    Unavailable { message: String },
}

impl MockError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        MockError::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MockError::Internal {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        MockError::Unavailable {
            message: message.into(),
        }
    }

    pub fn no_active_scenario(feature: impl Into<String>) -> Self {
        MockError::NoActiveScenario {
            feature: feature.into(),
        }
    }

    /// Not-found error with a freshly generated trace id
    pub fn mock_not_found() -> Self {
        MockError::MockNotFound {
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            MockError::BadRequest { .. } => 400,
            MockError::NoActiveScenario { .. } => 404,
            MockError::MockNotFound { .. } | MockError::Internal { .. } => 500,
            MockError::Unavailable { .. } => 503,
        }
    }

    /// gRPC status code equivalent of this error
    pub fn grpc_code(&self) -> i32 {
        match self {
            MockError::BadRequest { .. } => 3,
            MockError::NoActiveScenario { .. } => 5,
            MockError::MockNotFound { .. } | MockError::Internal { .. } => 13,
            MockError::Unavailable { .. } => 14,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            MockError::BadRequest { .. } => "BAD_REQUEST",
            MockError::MockNotFound { .. } => MOCK_NOT_FOUND_CODE,
            MockError::NoActiveScenario { .. } => "NO_ACTIVE_SCENARIO",
            MockError::Internal { .. } => "INTERNAL_ERROR",
            MockError::Unavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    /// Trace id owned by the error, if any
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            MockError::MockNotFound { trace_id } => Some(trace_id),
            _ => None,
        }
    }

    /// Render the client-facing error body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from(self)
    }
}

/// JSON body returned for every surfaced error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub http_status: u16,
    pub grpc_code: i32,
    pub error_code: String,
    pub error_message: String,
    pub details: BTreeMap<String, String>,
    pub trace_id: String,
}

impl From<&MockError> for ErrorResponse {
    fn from(err: &MockError) -> Self {
        let trace_id = err
            .trace_id()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut details = BTreeMap::new();
        details.insert(TRACE_ID_KEY.to_string(), trace_id);

        ErrorResponse::from_parts(
            err.http_status(),
            err.grpc_code(),
            err.error_code(),
            err.to_string(),
            details,
        )
    }
}

impl ErrorResponse {
    /// Build a response, promoting `x-trace-id` from the details
    pub fn from_parts(
        http_status: u16,
        grpc_code: i32,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
        details: BTreeMap<String, String>,
    ) -> Self {
        let trace_id = details.get(TRACE_ID_KEY).cloned().unwrap_or_default();
        Self {
            success: false,
            http_status,
            grpc_code,
            error_code: error_code.into(),
            error_message: error_message.into(),
            details,
            trace_id,
        }
    }
}
