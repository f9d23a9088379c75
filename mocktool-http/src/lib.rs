//! Outbound HTTP for mocktool
//!
//! Builds the shared `reqwest` client from [`HttpConfig`] and turns loosely
//! typed step definitions (method string, header map, raw body) into
//! requests.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{build_request, create_client};
pub use errors::{HttpError, HttpResult};
pub use mocktool_config::HttpConfig;
pub use types::{HttpMethod, HttpMethodError};
