//! Fixture files used to seed a store at startup
//!
//! A fixture is a YAML or JSON document (chosen by file extension) listing
//! features, scenarios, mock records, scenario activations and load-test
//! scenarios. Mock request bodies are given as structured `input` and
//! fingerprinted on load.

use mocktool_core::{AccountScenario, Feature, LoadTestScenario, LoadTestStep, MockApi, Scenario};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::repositories::{
    AccountScenarioRepository, FeatureRepository, LoadTestScenarioRepository, MockApiRepository,
    ScenarioRepository,
};
use crate::{StorageError, StorageResult};

/// Parsed fixture document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureFile {
    pub features: Vec<FeatureFixture>,
    pub scenarios: Vec<ScenarioFixture>,
    pub mock_apis: Vec<MockApiFixture>,
    pub activations: Vec<ActivationFixture>,
    pub load_tests: Vec<LoadTestFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFixture {
    pub feature: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockApiFixture {
    pub feature: String,
    pub scenario: String,
    #[serde(default)]
    pub name: String,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub headers: Option<Value>,
    pub output: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationFixture {
    pub feature: String,
    pub scenario: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub accounts: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub steps: Vec<LoadTestStep>,
}

/// Counts of entities written by [`FixtureFile::seed`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub features: usize,
    pub scenarios: usize,
    pub mock_apis: usize,
    pub activations: usize,
    pub load_tests: usize,
}

/// Read and parse a fixture file
pub fn load_fixtures(path: impl AsRef<Path>) -> StorageResult<FixtureFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => FixtureFile::from_json(&content),
        Some("yaml") | Some("yml") => FixtureFile::from_yaml(&content),
        other => Err(StorageError::Fixture(format!(
            "unsupported fixture extension {:?} for {}",
            other,
            path.display()
        ))),
    }
}

impl FixtureFile {
    pub fn from_yaml(content: &str) -> StorageResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write every fixture entity into `store`
    pub async fn seed<S>(&self, store: &S) -> StorageResult<SeedSummary>
    where
        S: FeatureRepository
            + ScenarioRepository
            + AccountScenarioRepository
            + MockApiRepository
            + LoadTestScenarioRepository,
    {
        let mut summary = SeedSummary::default();

        for fixture in &self.features {
            let mut feature = Feature::new(&fixture.name);
            feature.description = fixture.description.clone();
            if ensure_feature(store, feature).await? {
                summary.features += 1;
            }
        }

        for fixture in &self.scenarios {
            if ensure_feature(store, Feature::new(&fixture.feature)).await? {
                summary.features += 1;
            }
            let mut scenario = Scenario::new(&fixture.feature, &fixture.name);
            scenario.description = fixture.description.clone();
            store.create_scenario(scenario).await?;
            summary.scenarios += 1;
        }

        for fixture in &self.mock_apis {
            require_scenario(store, &fixture.feature, &fixture.scenario).await?;

            let mut mock = MockApi::new(
                &fixture.feature,
                &fixture.scenario,
                &fixture.path,
                &fixture.method,
                fixture.input.clone(),
                fixture.output.clone(),
            );
            mock.name = fixture.name.clone();
            mock.headers = fixture.headers.clone();
            mock.is_active = fixture.is_active;
            store.create_mock_api(mock).await?;
            summary.mock_apis += 1;
        }

        for fixture in &self.activations {
            let scenario = require_scenario(store, &fixture.feature, &fixture.scenario).await?;
            let account = fixture.account_id.as_deref();

            store
                .deactivate_by_feature_and_account(&fixture.feature, account)
                .await?;
            store
                .create_mapping(AccountScenario::new(
                    &fixture.feature,
                    scenario.id,
                    fixture.account_id.clone(),
                ))
                .await?;
            summary.activations += 1;
        }

        for fixture in &self.load_tests {
            let mut scenario = LoadTestScenario::new(&fixture.name, fixture.steps.clone());
            scenario.description = fixture.description.clone();
            scenario.concurrency = fixture.concurrency;
            scenario.accounts = fixture.accounts.clone();
            scenario.is_active = fixture.is_active;
            store.create_load_test_scenario(scenario).await?;
            summary.load_tests += 1;
        }

        tracing::info!(?summary, "Seeded store from fixtures");
        Ok(summary)
    }
}

/// Create the feature unless it already exists; returns whether it was created
async fn ensure_feature<S: FeatureRepository>(store: &S, feature: Feature) -> StorageResult<bool> {
    if store.find_feature_by_name(&feature.name).await?.is_some() {
        return Ok(false);
    }
    store.create_feature(feature).await?;
    Ok(true)
}

async fn require_scenario<S: ScenarioRepository>(
    store: &S,
    feature: &str,
    name: &str,
) -> StorageResult<Scenario> {
    store
        .find_scenario_by_name(feature, name)
        .await?
        .ok_or_else(|| {
            StorageError::Fixture(format!(
                "scenario '{}' of feature '{}' is not declared",
                name, feature
            ))
        })
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}
