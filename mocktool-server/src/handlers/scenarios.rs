//! Scenario activation endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use mocktool_resolver::AdminError;
use mocktool_web::{WebError, WebResult};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{non_blank, parse_scenario_id};
use crate::services::ServiceContainer;

#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    pub account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveQuery {
    pub feature_name: Option<String>,
    pub account_id: Option<String>,
}

fn admin_error(err: AdminError) -> WebError {
    match err {
        AdminError::ScenarioNotFound(_) => WebError::not_found(err.to_string()),
        AdminError::Storage { .. } => WebError::internal(err.to_string()),
    }
}

/// Activate a scenario globally, or for `?account_id=` only
pub async fn activate_scenario(
    State(ctx): State<ServiceContainer>,
    Path(scenario_id): Path<String>,
    Query(query): Query<AccountQuery>,
) -> WebResult<impl IntoResponse> {
    let scenario_id = parse_scenario_id(&scenario_id)?;
    let account_id = non_blank(query.account_id);

    info!(%scenario_id, account_id = ?account_id, "Activating scenario");
    ctx.admin
        .activate(scenario_id, account_id.as_deref())
        .await
        .map_err(admin_error)?;

    Ok(Json(json!({ "message": "scenario activated successfully" })))
}

/// Remove the global mapping, or the `?account_id=` mapping, of the scenario's feature
pub async fn deactivate_scenario(
    State(ctx): State<ServiceContainer>,
    Path(scenario_id): Path<String>,
    Query(query): Query<AccountQuery>,
) -> WebResult<impl IntoResponse> {
    let scenario_id = parse_scenario_id(&scenario_id)?;
    let account_id = non_blank(query.account_id);

    info!(%scenario_id, account_id = ?account_id, "Deactivating scenario");
    ctx.admin
        .deactivate(scenario_id, account_id.as_deref())
        .await
        .map_err(admin_error)?;

    Ok(Json(json!({ "message": "scenario deactivated successfully" })))
}

/// The scenario a `(feature, account?)` pair currently resolves to
pub async fn active_scenario(
    State(ctx): State<ServiceContainer>,
    Query(query): Query<ActiveQuery>,
) -> WebResult<impl IntoResponse> {
    let feature = non_blank(query.feature_name)
        .ok_or_else(|| WebError::bad_request("feature_name is required"))?;
    let account_id = non_blank(query.account_id);

    let selected = ctx.selector.select(&feature, account_id.as_deref()).await?;

    Ok(Json(json!({
        "feature_name": feature,
        "account_id": selected.mapping.account_id,
        "scenario_id": selected.scenario.id,
        "scenario_name": selected.scenario.name,
    })))
}
