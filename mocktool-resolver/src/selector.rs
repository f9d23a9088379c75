//! Active scenario selection

use mocktool_core::{AccountScenario, MockError, MockResult, Scenario};
use mocktool_storage::{AccountScenarioRepository, ScenarioRepository};
use std::sync::Arc;
use tracing::debug;

/// The mapping that decided the scenario, and the scenario itself
#[derive(Debug, Clone)]
pub struct SelectedScenario {
    pub mapping: AccountScenario,
    pub scenario: Scenario,
}

/// Resolves `(feature, account?)` to the active scenario
///
/// An account-specific mapping always wins over the feature's global one.
#[derive(Clone)]
pub struct ScenarioSelector {
    mappings: Arc<dyn AccountScenarioRepository>,
    scenarios: Arc<dyn ScenarioRepository>,
}

impl ScenarioSelector {
    pub fn new(
        mappings: Arc<dyn AccountScenarioRepository>,
        scenarios: Arc<dyn ScenarioRepository>,
    ) -> Self {
        Self {
            mappings,
            scenarios,
        }
    }

    pub async fn select(&self, feature: &str, account_id: Option<&str>) -> MockResult<SelectedScenario> {
        let mapping = self
            .mappings
            .get_active_scenario(feature, account_id)
            .await
            .map_err(|e| MockError::internal(format!("failed to get active scenario: {}", e)))?
            .ok_or_else(|| MockError::no_active_scenario(feature))?;

        let scenario = self
            .scenarios
            .get_scenario_by_id(mapping.scenario_id)
            .await
            .map_err(|e| MockError::internal(format!("failed to get scenario details: {}", e)))?
            .ok_or_else(|| {
                MockError::internal(format!("active scenario {} no longer exists", mapping.scenario_id))
            })?;

        debug!(
            feature = %feature,
            scenario = %scenario.name,
            account_specific = !mapping.is_global(),
            "Selected active scenario"
        );

        Ok(SelectedScenario { mapping, scenario })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktool_storage::InMemoryStore;

    async fn seeded() -> (Arc<InMemoryStore>, Scenario, Scenario) {
        let store = Arc::new(InMemoryStore::new());
        let global = store.create_scenario(Scenario::new("svc", "happy")).await.unwrap();
        let override_ = store.create_scenario(Scenario::new("svc", "degraded")).await.unwrap();
        store
            .create_mapping(AccountScenario::new("svc", global.id, None))
            .await
            .unwrap();
        store
            .create_mapping(AccountScenario::new("svc", override_.id, Some("acct-1".to_string())))
            .await
            .unwrap();
        (store, global, override_)
    }

    #[tokio::test]
    async fn test_account_override_and_global_fallback() {
        let (store, global, override_) = seeded().await;
        let selector = ScenarioSelector::new(store.clone(), store);

        let selected = selector.select("svc", Some("acct-1")).await.unwrap();
        assert_eq!(selected.scenario.id, override_.id);
        assert!(!selected.mapping.is_global());

        let selected = selector.select("svc", Some("acct-unknown")).await.unwrap();
        assert_eq!(selected.scenario.id, global.id);

        let selected = selector.select("svc", None).await.unwrap();
        assert_eq!(selected.scenario.name, "happy");
    }

    #[tokio::test]
    async fn test_no_mapping_is_no_active_scenario() {
        let store = Arc::new(InMemoryStore::new());
        let selector = ScenarioSelector::new(store.clone(), store);

        let err = selector.select("other", None).await.unwrap_err();
        assert_eq!(err, MockError::no_active_scenario("other"));
    }

    #[tokio::test]
    async fn test_dangling_mapping_is_internal() {
        let store = Arc::new(InMemoryStore::new());
        store
            .create_mapping(AccountScenario::new("svc", uuid::Uuid::new_v4(), None))
            .await
            .unwrap();
        let selector = ScenarioSelector::new(store.clone(), store);

        let err = selector.select("svc", None).await.unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
