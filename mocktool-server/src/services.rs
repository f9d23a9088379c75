//! Service construction and dependency injection

use anyhow::{Context, Result};
use mocktool_caching::{create_mock_cache, MockCache};
use mocktool_config::MocktoolConfig;
use mocktool_loadtest::{LoadRunner, StepExecutor};
use mocktool_resolver::{MockResolver, ResolverMetrics, ScenarioAdmin, ScenarioSelector};
use mocktool_storage::{load_fixtures, InMemoryStore};
use std::sync::Arc;
use tracing::info;

/// Everything the HTTP handlers need, cheap to clone
#[derive(Clone)]
pub struct ServiceContainer {
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<dyn MockCache>,
    pub selector: ScenarioSelector,
    pub resolver: Arc<MockResolver>,
    pub admin: ScenarioAdmin,
    pub load_runner: LoadRunner,
}

impl ServiceContainer {
    /// Build services from configuration, seeding the store from fixtures
    pub async fn new(config: &MocktoolConfig) -> Result<Self> {
        let store = Arc::new(InMemoryStore::new());

        if let Some(path) = &config.storage.fixtures_path {
            let fixtures = load_fixtures(path)
                .with_context(|| format!("Failed to load fixtures from {}", path))?;
            let summary = fixtures
                .seed(store.as_ref())
                .await
                .with_context(|| format!("Failed to seed fixtures from {}", path))?;
            info!(
                features = summary.features,
                scenarios = summary.scenarios,
                mock_apis = summary.mock_apis,
                activations = summary.activations,
                load_tests = summary.load_tests,
                "Seeded store from {}",
                path
            );
        }

        let cache = create_mock_cache(&config.cache);
        let executor = StepExecutor::from_config(&config.http, &config.loadtest)
            .context("Failed to create load test HTTP client")?;
        let load_runner = LoadRunner::new(Arc::new(executor), config.loadtest.max_concurrency);

        Ok(Self::with_components(store, cache, load_runner))
    }

    /// Wire services around an existing store, cache and runner
    pub fn with_components(
        store: Arc<InMemoryStore>,
        cache: Arc<dyn MockCache>,
        load_runner: LoadRunner,
    ) -> Self {
        let selector = ScenarioSelector::new(store.clone(), store.clone());
        let resolver = MockResolver::new(
            selector.clone(),
            store.clone(),
            cache.clone(),
            Arc::new(ResolverMetrics::new()),
        );
        let admin = ScenarioAdmin::new(store.clone(), store.clone(), cache.clone());

        Self {
            store,
            cache,
            selector,
            resolver: Arc::new(resolver),
            admin,
            load_runner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktool_storage::{AccountScenarioRepository, LoadTestScenarioRepository};
    use std::io::Write;

    #[tokio::test]
    async fn test_new_seeds_fixtures() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
scenarios:
  - feature: payments
    name: happy
mock_apis:
  - feature: payments
    scenario: happy
    path: /charge
    method: POST
    input: {{"amount": 10}}
    output: {{"status": "ok"}}
activations:
  - feature: payments
    scenario: happy
load_tests:
  - name: smoke
    accounts: "u-p"
    steps: []
"#
        )
        .unwrap();

        let mut config = MocktoolConfig::default();
        config.storage.fixtures_path = Some(file.path().display().to_string());

        let services = ServiceContainer::new(&config).await.unwrap();

        assert_eq!(services.store.mock_api_count(), 1);
        assert!(services
            .store
            .get_active_scenario("payments", None)
            .await
            .unwrap()
            .is_some());
        assert_eq!(services.store.list_load_test_scenarios().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fixture_file_is_an_error() {
        let mut config = MocktoolConfig::default();
        config.storage.fixtures_path = Some("/nonexistent/fixtures.yaml".to_string());

        let err = ServiceContainer::new(&config).await.err().unwrap();
        assert!(err.to_string().contains("Failed to load fixtures"));
    }
}
