//! Runtime scenario model, account parsing and YAML scenario files

use mocktool_core::{LoadTestScenario, LoadTestStep};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::error::{LoadResult, LoadTestError};

/// Credentials one scenario execution runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A scenario as the runner executes it
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub concurrency: usize,
    /// Accounts declared alongside the scenario, in `parse_accounts` form
    pub accounts: String,
    pub steps: Vec<LoadTestStep>,
}

impl From<&LoadTestScenario> for Scenario {
    fn from(stored: &LoadTestScenario) -> Self {
        Self {
            name: stored.name.clone(),
            concurrency: stored.concurrency,
            accounts: stored.accounts.clone(),
            steps: stored.steps.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    concurrency: usize,
    #[serde(default)]
    accounts: String,
    #[serde(default)]
    steps: Vec<LoadTestStep>,
}

impl Scenario {
    /// Parse a YAML scenario; `default_name` applies when the file has none
    pub fn from_yaml(content: &str, default_name: &str) -> LoadResult<Self> {
        let file: ScenarioFile = serde_yaml::from_str(content)?;
        let name = if file.name.is_empty() {
            default_name.to_string()
        } else {
            file.name
        };

        Ok(Self {
            name,
            concurrency: file.concurrency,
            accounts: file.accounts,
            steps: file.steps,
        })
    }

    /// Read a scenario file, naming it after the file stem when unnamed
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(LoadTestError::ScenarioFile)?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::from_yaml(&content, stem)
    }
}

/// Load `<dir>/<name>.yaml`, falling back to `<dir>/<name>.yml`
pub fn load_scenario_file(dir: &Path, name: &str) -> LoadResult<Scenario> {
    let content = match std::fs::read_to_string(dir.join(format!("{}.yaml", name))) {
        Ok(content) => content,
        Err(_) => std::fs::read_to_string(dir.join(format!("{}.yml", name)))
            .map_err(LoadTestError::ScenarioFile)?,
    };
    Scenario::from_yaml(&content, name)
}

/// Parse `user1-pass1,user2-pass2`.
///
/// Blank entries are ignored and entries that do not split into exactly one
/// username and one password are skipped with a warning.
pub fn parse_accounts(spec: &str) -> Vec<Account> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split('-').collect();
            match parts.as_slice() {
                [username, password] => Some(Account::new(*username, *password)),
                _ => {
                    warn!("{}", LoadTestError::InvalidAccount(entry.to_string()));
                    None
                }
            }
        })
        .collect()
}
