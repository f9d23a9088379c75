//! Mock resolution for mocktool
//!
//! [`MockResolver`] turns a forwarded request into a stored response:
//! it picks the active scenario for the caller, fingerprints the body,
//! consults the cache, falls back to storage and sanitizes the record's
//! response headers. [`ScenarioAdmin`] performs the activation changes that
//! decide which scenario the selector returns.

pub mod admin;
pub mod metrics;
pub mod request;
pub mod resolver;
pub mod selector;

pub use admin::{AdminError, AdminResult, ScenarioAdmin};
pub use metrics::{HistogramSnapshot, LookupCount, MetricsSnapshot, ResolverMetrics};
pub use request::{compose_path, ForwardMode, ForwardRequest, MockResponse};
pub use resolver::MockResolver;
pub use selector::{ScenarioSelector, SelectedScenario};
