//! Scenario activation
//!
//! Activating a scenario globally removes every account-specific override of
//! its feature, so afterwards all accounts see the same scenario. Activating
//! for one account only replaces that account's mapping. Each change drops the
//! feature's cached responses.

use mocktool_caching::{feature_pattern, MockCache};
use mocktool_core::{AccountScenario, Scenario};
use mocktool_storage::{AccountScenarioRepository, ScenarioRepository, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("scenario not found")]
    ScenarioNotFound(Uuid),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

fn storage(context: &'static str) -> impl FnOnce(StorageError) -> AdminError {
    move |source| AdminError::Storage { context, source }
}

#[derive(Clone)]
pub struct ScenarioAdmin {
    scenarios: Arc<dyn ScenarioRepository>,
    mappings: Arc<dyn AccountScenarioRepository>,
    cache: Arc<dyn MockCache>,
}

impl ScenarioAdmin {
    pub fn new(
        scenarios: Arc<dyn ScenarioRepository>,
        mappings: Arc<dyn AccountScenarioRepository>,
        cache: Arc<dyn MockCache>,
    ) -> Self {
        Self {
            scenarios,
            mappings,
            cache,
        }
    }

    /// Make `scenario_id` the active scenario of its feature, for one account or globally
    pub async fn activate(
        &self,
        scenario_id: Uuid,
        account_id: Option<&str>,
    ) -> AdminResult<AccountScenario> {
        let scenario = self.scenario(scenario_id).await?;
        let feature = scenario.feature_name.as_str();

        if account_id.is_none() {
            self.mappings
                .deactivate_all_account_specific(feature)
                .await
                .map_err(storage("failed to deactivate account-specific scenarios"))?;
        }

        self.mappings
            .deactivate_by_feature_and_account(feature, account_id)
            .await
            .map_err(storage("failed to deactivate existing scenario"))?;

        let mapping = self
            .mappings
            .create_mapping(AccountScenario::new(
                feature,
                scenario.id,
                account_id.map(str::to_string),
            ))
            .await
            .map_err(storage("failed to activate scenario"))?;

        info!(
            feature = %feature,
            scenario = %scenario.name,
            account_id = account_id.unwrap_or("*"),
            "Scenario activated"
        );
        self.invalidate(feature).await;

        Ok(mapping)
    }

    /// Remove the `(feature, account?)` mapping of the scenario's feature
    pub async fn deactivate(&self, scenario_id: Uuid, account_id: Option<&str>) -> AdminResult<u64> {
        let scenario = self.scenario(scenario_id).await?;
        let feature = scenario.feature_name.as_str();

        let removed = self
            .mappings
            .deactivate_by_feature_and_account(feature, account_id)
            .await
            .map_err(storage("failed to deactivate scenario"))?;

        info!(
            feature = %feature,
            scenario = %scenario.name,
            account_id = account_id.unwrap_or("*"),
            removed,
            "Scenario deactivated"
        );
        self.invalidate(feature).await;

        Ok(removed)
    }

    async fn scenario(&self, scenario_id: Uuid) -> AdminResult<Scenario> {
        self.scenarios
            .get_scenario_by_id(scenario_id)
            .await
            .map_err(storage("failed to load scenario"))?
            .ok_or(AdminError::ScenarioNotFound(scenario_id))
    }

    async fn invalidate(&self, feature: &str) {
        let pattern = feature_pattern(feature);
        if let Err(e) = self.cache.invalidate_all(&pattern).await {
            warn!(pattern = %pattern, error = %e, "Cache invalidation failed");
        }
    }
}
