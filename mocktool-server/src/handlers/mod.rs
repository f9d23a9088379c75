//! HTTP handlers

pub mod forward;
pub mod health;
pub mod loadtest;
pub mod scenarios;

pub use forward::{forward, public_forward};
pub use health::{health_check, metrics, readiness_check};
pub use loadtest::{list_load_tests, run_load_test};
pub use scenarios::{activate_scenario, active_scenario, deactivate_scenario};

use mocktool_web::{WebError, WebResult};
use uuid::Uuid;

/// Parse a `{scenario_id}` path segment
pub(crate) fn parse_scenario_id(raw: &str) -> WebResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| WebError::bad_request("invalid scenario_id"))
}

/// Treat blank query values as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
