//! Cache key layout
//!
//! Keys are `mocktool:{feature}:{scenario}:{account}:{path}:{method}:{hash}`
//! where `account` and `hash` may be empty. Invalidation patterns select
//! prefixes of that layout; their literal segments are glob-escaped so that
//! names containing `*`, `?` or `[` only match themselves.

use glob::Pattern;

/// Namespace prefix shared by every key
pub const KEY_PREFIX: &str = "mocktool";

/// Key of one resolved mock response
pub fn mock_api_key(
    feature: &str,
    scenario: &str,
    account_id: Option<&str>,
    path: &str,
    method: &str,
    hash: &str,
) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}:{}",
        KEY_PREFIX,
        feature,
        scenario,
        account_id.unwrap_or_default(),
        path,
        method,
        hash
    )
}

/// Every cached response
pub fn all_pattern() -> String {
    format!("{}:*", KEY_PREFIX)
}

/// Every cached response of a feature
pub fn feature_pattern(feature: &str) -> String {
    format!("{}:{}:*", KEY_PREFIX, Pattern::escape(feature))
}

/// Every cached response of one scenario of a feature
pub fn scenario_pattern(feature: &str, scenario: &str) -> String {
    format!(
        "{}:{}:{}:*",
        KEY_PREFIX,
        Pattern::escape(feature),
        Pattern::escape(scenario)
    )
}

/// Every cached response of one account within a scenario
pub fn account_pattern(feature: &str, scenario: &str, account_id: &str) -> String {
    format!(
        "{}:{}:{}:{}:*",
        KEY_PREFIX,
        Pattern::escape(feature),
        Pattern::escape(scenario),
        Pattern::escape(account_id)
    )
}
