//! Repository interfaces
//!
//! Each trait covers one entity of the mock domain. Lookups return
//! `Ok(None)` on a miss; errors are reserved for failures of the store itself
//! or violated constraints.

use async_trait::async_trait;
use mocktool_core::{AccountScenario, Feature, LoadTestScenario, MockApi, Scenario};
use uuid::Uuid;

use crate::StorageResult;

/// Base repository trait with health check capability
#[async_trait]
pub trait Repository: Send + Sync {
    /// Check if the repository is healthy and can serve requests
    async fn health_check(&self) -> StorageResult<()>;
}

#[async_trait]
pub trait FeatureRepository: Repository {
    /// Create a feature; names are unique
    async fn create_feature(&self, feature: Feature) -> StorageResult<Feature>;

    async fn find_feature_by_name(&self, name: &str) -> StorageResult<Option<Feature>>;

    async fn list_features(&self) -> StorageResult<Vec<Feature>>;
}

#[async_trait]
pub trait ScenarioRepository: Repository {
    /// Create a scenario; `(feature_name, name)` is unique
    async fn create_scenario(&self, scenario: Scenario) -> StorageResult<Scenario>;

    async fn get_scenario_by_id(&self, id: Uuid) -> StorageResult<Option<Scenario>>;

    async fn find_scenario_by_name(
        &self,
        feature_name: &str,
        name: &str,
    ) -> StorageResult<Option<Scenario>>;

    async fn list_scenarios_by_feature(&self, feature_name: &str) -> StorageResult<Vec<Scenario>>;
}

#[async_trait]
pub trait AccountScenarioRepository: Repository {
    /// Exact mapping for `(feature, account)`; `None` account selects the global row
    async fn find_mapping(
        &self,
        feature_name: &str,
        account_id: Option<&str>,
    ) -> StorageResult<Option<AccountScenario>>;

    /// Active mapping for a feature: the account's own row when present, else the global row
    async fn get_active_scenario(
        &self,
        feature_name: &str,
        account_id: Option<&str>,
    ) -> StorageResult<Option<AccountScenario>> {
        if let Some(account) = account_id {
            if let Some(mapping) = self.find_mapping(feature_name, Some(account)).await? {
                return Ok(Some(mapping));
            }
        }
        self.find_mapping(feature_name, None).await
    }

    /// Delete every account-specific mapping of a feature
    async fn deactivate_all_account_specific(&self, feature_name: &str) -> StorageResult<u64>;

    /// Delete the mapping for `(feature, account)`; `None` deletes the global row
    async fn deactivate_by_feature_and_account(
        &self,
        feature_name: &str,
        account_id: Option<&str>,
    ) -> StorageResult<u64>;

    /// Insert a mapping; at most one per `(feature, account)`
    async fn create_mapping(&self, mapping: AccountScenario) -> StorageResult<AccountScenario>;

    async fn list_mappings_by_feature(
        &self,
        feature_name: &str,
    ) -> StorageResult<Vec<AccountScenario>>;
}

#[async_trait]
pub trait MockApiRepository: Repository {
    /// Insert a mock; the lookup tuple is unique among active records
    async fn create_mock_api(&self, mock: MockApi) -> StorageResult<MockApi>;

    /// Active record answering `(feature, scenario, path, method, hash)`
    async fn find_mock_api(
        &self,
        feature_name: &str,
        scenario_name: &str,
        path: &str,
        method: &str,
        hash_input: &str,
    ) -> StorageResult<Option<MockApi>>;

    async fn list_mock_apis_by_scenario(
        &self,
        feature_name: &str,
        scenario_name: &str,
    ) -> StorageResult<Vec<MockApi>>;
}

#[async_trait]
pub trait LoadTestScenarioRepository: Repository {
    /// Insert a load-test scenario; names are unique
    async fn create_load_test_scenario(
        &self,
        scenario: LoadTestScenario,
    ) -> StorageResult<LoadTestScenario>;

    async fn get_load_test_scenario(&self, id: Uuid) -> StorageResult<Option<LoadTestScenario>>;

    async fn find_load_test_scenario_by_name(
        &self,
        name: &str,
    ) -> StorageResult<Option<LoadTestScenario>>;

    async fn list_load_test_scenarios(&self) -> StorageResult<Vec<LoadTestScenario>>;
}
