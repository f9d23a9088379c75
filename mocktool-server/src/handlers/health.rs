//! Health, readiness and metrics endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mocktool_storage::Repository;
use serde_json::json;
use tracing::{debug, warn};

use crate::services::ServiceContainer;

const SERVICE_NAME: &str = "mocktool";

pub async fn health_check() -> impl IntoResponse {
    debug!("Health check requested");
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

/// Ready once the store answers its health check
pub async fn readiness_check(State(ctx): State<ServiceContainer>) -> impl IntoResponse {
    match ctx.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "service": SERVICE_NAME,
                "database": "connected",
            })),
        ),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not ready",
                    "service": SERVICE_NAME,
                    "error": "database connection failed",
                })),
            )
        }
    }
}

/// Resolver counters and cache statistics
pub async fn metrics(State(ctx): State<ServiceContainer>) -> impl IntoResponse {
    Json(json!({
        "resolver": ctx.resolver.metrics().snapshot(),
        "cache": ctx.cache.stats().await,
    }))
}
