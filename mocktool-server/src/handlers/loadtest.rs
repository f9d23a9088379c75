//! Stored load-test scenarios

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use mocktool_loadtest::{parse_accounts, Scenario};
use mocktool_storage::LoadTestScenarioRepository;
use mocktool_web::{WebError, WebResult};
use tracing::info;

use super::parse_scenario_id;
use crate::services::ServiceContainer;

pub async fn list_load_tests(State(ctx): State<ServiceContainer>) -> WebResult<impl IntoResponse> {
    let scenarios = ctx
        .store
        .list_load_test_scenarios()
        .await
        .map_err(|e| WebError::internal(format!("failed to list load test scenarios: {}", e)))?;

    Ok(Json(scenarios))
}

/// Run a stored scenario against its embedded accounts and return the result
pub async fn run_load_test(
    State(ctx): State<ServiceContainer>,
    Path(scenario_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let scenario_id = parse_scenario_id(&scenario_id)?;

    let stored = ctx
        .store
        .get_load_test_scenario(scenario_id)
        .await
        .map_err(|e| WebError::internal(format!("failed to load scenario: {}", e)))?
        .ok_or_else(|| WebError::not_found("scenario not found"))?;

    if !stored.is_active {
        return Err(WebError::bad_request("scenario is not active"));
    }
    if stored.accounts.trim().is_empty() {
        return Err(WebError::bad_request(
            "no accounts configured for this scenario",
        ));
    }

    let accounts = parse_accounts(&stored.accounts);
    if accounts.is_empty() {
        return Err(WebError::bad_request("failed to parse accounts"));
    }

    info!(
        scenario = %stored.name,
        accounts = accounts.len(),
        "Running stored load test"
    );
    let result = ctx.load_runner.run(&Scenario::from(&stored), accounts).await;

    Ok(Json(result))
}
