//! Core domain models and types for mocktool
//!
//! This crate contains the entities shared by the mock resolver and the load
//! runner, the error taxonomy surfaced to clients, the canonical request-body
//! fingerprint and the response-header sanitizer.

pub mod error;
pub mod hash;
pub mod models;
pub mod path;
pub mod sanitizer;

pub use error::{ErrorResponse, MockError, MockResult};
pub use hash::{canonical_hash, canonical_json, hash_value};
pub use path::{canonical_path, compose_path};
pub use models::{AccountScenario, Feature, LoadTestScenario, LoadTestStep, MockApi, Scenario};
pub use sanitizer::{sanitize_header_value, sanitize_headers, SanitizedHeaders};
