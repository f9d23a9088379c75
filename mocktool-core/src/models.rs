//! Domain entities shared by storage, the resolver and the load runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A named family of mock behaviours
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named variant of a feature's responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: Uuid,
    pub feature_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scenario {
    pub fn new(feature_name: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            feature_name: feature_name.into(),
            name: name.into(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Which scenario is active for a feature, either for one account or globally
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountScenario {
    pub id: Uuid,
    pub feature_name: String,
    pub scenario_id: Uuid,
    /// `None` marks the feature's global default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountScenario {
    pub fn new(
        feature_name: impl Into<String>,
        scenario_id: Uuid,
        account_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            feature_name: feature_name.into(),
            scenario_id,
            account_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_global(&self) -> bool {
        self.account_id.is_none()
    }
}

/// One stored request fingerprint to response mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockApi {
    pub id: Uuid,
    pub feature_name: String,
    pub scenario_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    pub method: String,
    /// Request body the mock answers to, kept for reference
    #[serde(default)]
    pub input: Value,
    /// Canonical hash of `input`
    #[serde(default)]
    pub hash_input: String,
    /// Response headers document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    /// Response body document
    pub output: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MockApi {
    /// New active record; the fingerprint is derived from `input` and the
    /// query part of `path` is put in canonical order
    pub fn new(
        feature_name: impl Into<String>,
        scenario_name: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
        input: Value,
        output: Value,
    ) -> Self {
        let now = Utc::now();
        let hash_input = crate::hash::hash_value(&input);
        Self {
            id: Uuid::new_v4(),
            feature_name: feature_name.into(),
            scenario_name: scenario_name.into(),
            name: String::new(),
            description: String::new(),
            path: crate::path::canonical_path(&path.into()),
            method: method.into().to_uppercase(),
            input,
            hash_input,
            headers: None,
            output,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Whether this record answers the given lookup tuple
    pub fn matches(
        &self,
        feature_name: &str,
        scenario_name: &str,
        path: &str,
        method: &str,
        hash_input: &str,
    ) -> bool {
        self.feature_name == feature_name
            && self.scenario_name == scenario_name
            && self.path == path
            && self.method.eq_ignore_ascii_case(method)
            && self.hash_input == hash_input
    }
}

/// One HTTP call within a load-test scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadTestStep {
    pub name: String,
    #[serde(default)]
    pub method: String,
    /// Absolute URL or an inline `curl` command
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Variable name to `header.<name>` or JSON path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub save_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "is_zero_u16")]
    pub expect_status: u16,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub wait_after_seconds: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub retry_for_seconds: u64,
    /// 0 means unbounded within the retry window
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub max_retry_times: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
}

/// A persisted load-test scenario with its embedded account list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadTestScenario {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Comma-separated `username-password` pairs
    #[serde(default)]
    pub accounts: String,
    #[serde(default)]
    pub steps: Vec<LoadTestStep>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoadTestScenario {
    pub fn new(name: impl Into<String>, steps: Vec<LoadTestStep>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            concurrency: default_concurrency(),
            accounts: String::new(),
            steps,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

fn is_zero_u16(n: &u16) -> bool {
    *n == 0
}

fn is_zero_u32(n: &u32) -> bool {
    *n == 0
}

fn is_zero_u64(n: &u64) -> bool {
    *n == 0
}
