//! In-memory implementation of every repository

use async_trait::async_trait;
use mocktool_core::{canonical_path, AccountScenario, Feature, LoadTestScenario, MockApi, Scenario};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::repositories::{
    AccountScenarioRepository, FeatureRepository, LoadTestScenarioRepository, MockApiRepository,
    Repository, ScenarioRepository,
};
use crate::{StorageError, StorageResult};

#[derive(Debug, Default)]
struct StoreData {
    features: Vec<Feature>,
    scenarios: Vec<Scenario>,
    mappings: Vec<AccountScenario>,
    mock_apis: Vec<MockApi>,
    load_tests: Vec<LoadTestScenario>,
}

/// Process-local store guarded by a single read-write lock
#[derive(Debug)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
    healthy: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Flip the health flag reported by `health_check`
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }

    /// Number of stored mock records
    pub fn mock_api_count(&self) -> usize {
        self.data.read().mock_apis.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryStore {
    async fn health_check(&self) -> StorageResult<()> {
        if self.healthy.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(StorageError::ConnectionFailed(
                "in-memory store marked unhealthy".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FeatureRepository for InMemoryStore {
    async fn create_feature(&self, feature: Feature) -> StorageResult<Feature> {
        if feature.name.trim().is_empty() {
            return Err(StorageError::ValidationFailed(
                "feature name cannot be empty".to_string(),
            ));
        }

        let mut data = self.data.write();
        if data.features.iter().any(|f| f.name == feature.name) {
            return Err(StorageError::DuplicateKey(format!("feature '{}'", feature.name)));
        }
        data.features.push(feature.clone());
        Ok(feature)
    }

    async fn find_feature_by_name(&self, name: &str) -> StorageResult<Option<Feature>> {
        Ok(self
            .data
            .read()
            .features
            .iter()
            .find(|f| f.name == name)
            .cloned())
    }

    async fn list_features(&self) -> StorageResult<Vec<Feature>> {
        Ok(self.data.read().features.clone())
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryStore {
    async fn create_scenario(&self, scenario: Scenario) -> StorageResult<Scenario> {
        let mut data = self.data.write();
        if data
            .scenarios
            .iter()
            .any(|s| s.feature_name == scenario.feature_name && s.name == scenario.name)
        {
            return Err(StorageError::DuplicateKey(format!(
                "scenario '{}' of feature '{}'",
                scenario.name, scenario.feature_name
            )));
        }
        data.scenarios.push(scenario.clone());
        Ok(scenario)
    }

    async fn get_scenario_by_id(&self, id: Uuid) -> StorageResult<Option<Scenario>> {
        Ok(self
            .data
            .read()
            .scenarios
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_scenario_by_name(
        &self,
        feature_name: &str,
        name: &str,
    ) -> StorageResult<Option<Scenario>> {
        Ok(self
            .data
            .read()
            .scenarios
            .iter()
            .find(|s| s.feature_name == feature_name && s.name == name)
            .cloned())
    }

    async fn list_scenarios_by_feature(&self, feature_name: &str) -> StorageResult<Vec<Scenario>> {
        Ok(self
            .data
            .read()
            .scenarios
            .iter()
            .filter(|s| s.feature_name == feature_name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountScenarioRepository for InMemoryStore {
    async fn find_mapping(
        &self,
        feature_name: &str,
        account_id: Option<&str>,
    ) -> StorageResult<Option<AccountScenario>> {
        Ok(self
            .data
            .read()
            .mappings
            .iter()
            .find(|m| m.feature_name == feature_name && m.account_id.as_deref() == account_id)
            .cloned())
    }

    async fn deactivate_all_account_specific(&self, feature_name: &str) -> StorageResult<u64> {
        let mut data = self.data.write();
        let before = data.mappings.len();
        data.mappings
            .retain(|m| !(m.feature_name == feature_name && m.account_id.is_some()));
        Ok((before - data.mappings.len()) as u64)
    }

    async fn deactivate_by_feature_and_account(
        &self,
        feature_name: &str,
        account_id: Option<&str>,
    ) -> StorageResult<u64> {
        let mut data = self.data.write();
        let before = data.mappings.len();
        data.mappings
            .retain(|m| !(m.feature_name == feature_name && m.account_id.as_deref() == account_id));
        Ok((before - data.mappings.len()) as u64)
    }

    async fn create_mapping(&self, mapping: AccountScenario) -> StorageResult<AccountScenario> {
        let mut data = self.data.write();
        if data.mappings.iter().any(|m| {
            m.feature_name == mapping.feature_name && m.account_id == mapping.account_id
        }) {
            return Err(StorageError::DuplicateKey(format!(
                "mapping for feature '{}' and account {:?}",
                mapping.feature_name, mapping.account_id
            )));
        }
        data.mappings.push(mapping.clone());
        Ok(mapping)
    }

    async fn list_mappings_by_feature(
        &self,
        feature_name: &str,
    ) -> StorageResult<Vec<AccountScenario>> {
        Ok(self
            .data
            .read()
            .mappings
            .iter()
            .filter(|m| m.feature_name == feature_name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MockApiRepository for InMemoryStore {
    async fn create_mock_api(&self, mut mock: MockApi) -> StorageResult<MockApi> {
        mock.path = canonical_path(&mock.path);
        let mut data = self.data.write();
        if mock.is_active
            && data.mock_apis.iter().any(|m| {
                m.is_active
                    && m.matches(
                        &mock.feature_name,
                        &mock.scenario_name,
                        &mock.path,
                        &mock.method,
                        &mock.hash_input,
                    )
            })
        {
            return Err(StorageError::DuplicateKey(format!(
                "active mock {} {} in {}/{}",
                mock.method, mock.path, mock.feature_name, mock.scenario_name
            )));
        }
        data.mock_apis.push(mock.clone());
        Ok(mock)
    }

    async fn find_mock_api(
        &self,
        feature_name: &str,
        scenario_name: &str,
        path: &str,
        method: &str,
        hash_input: &str,
    ) -> StorageResult<Option<MockApi>> {
        Ok(self
            .data
            .read()
            .mock_apis
            .iter()
            .find(|m| {
                m.is_active && m.matches(feature_name, scenario_name, path, method, hash_input)
            })
            .cloned())
    }

    async fn list_mock_apis_by_scenario(
        &self,
        feature_name: &str,
        scenario_name: &str,
    ) -> StorageResult<Vec<MockApi>> {
        Ok(self
            .data
            .read()
            .mock_apis
            .iter()
            .filter(|m| m.feature_name == feature_name && m.scenario_name == scenario_name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LoadTestScenarioRepository for InMemoryStore {
    async fn create_load_test_scenario(
        &self,
        scenario: LoadTestScenario,
    ) -> StorageResult<LoadTestScenario> {
        let mut data = self.data.write();
        if data.load_tests.iter().any(|s| s.name == scenario.name) {
            return Err(StorageError::DuplicateKey(format!(
                "load test scenario '{}'",
                scenario.name
            )));
        }
        data.load_tests.push(scenario.clone());
        Ok(scenario)
    }

    async fn get_load_test_scenario(&self, id: Uuid) -> StorageResult<Option<LoadTestScenario>> {
        Ok(self
            .data
            .read()
            .load_tests
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_load_test_scenario_by_name(
        &self,
        name: &str,
    ) -> StorageResult<Option<LoadTestScenario>> {
        Ok(self
            .data
            .read()
            .load_tests
            .iter()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn list_load_test_scenarios(&self) -> StorageResult<Vec<LoadTestScenario>> {
        Ok(self.data.read().load_tests.clone())
    }
}
