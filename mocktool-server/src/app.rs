//! Router setup

use axum::{
    middleware::from_fn,
    routing::{any, delete, get, post},
    Router,
};
use mocktool_config::ServerConfig;
use mocktool_web::{cors_layer, request_id_middleware};
use tower_http::trace::TraceLayer;

use crate::{handlers, services::ServiceContainer};

/// Create the complete application
pub fn create_app(services: ServiceContainer, config: &ServerConfig) -> Router {
    let app = Router::new()
        // Health endpoints (no prefix)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        // Forwarding endpoints
        .route("/forward/{*path}", any(handlers::forward))
        .route("/public/forward/{*path}", any(handlers::public_forward))
        // Administration with prefix
        .nest(&config.api_prefix, create_api_router())
        .with_state(services);

    // Layers wrap in reverse order: CORS outermost, then request id, then tracing
    let mut app = app;
    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    if config.enable_request_id {
        app = app.layer(from_fn(request_id_middleware));
    }

    if config.enable_cors {
        app = app.layer(cors_layer(&config.cors));
    }

    app
}

fn create_api_router() -> Router<ServiceContainer> {
    Router::new()
        .route("/scenarios/active", get(handlers::active_scenario))
        .route(
            "/scenarios/{scenario_id}/activate",
            post(handlers::activate_scenario),
        )
        .route(
            "/scenarios/{scenario_id}/deactivate",
            delete(handlers::deactivate_scenario),
        )
        .route("/loadtest/scenarios", get(handlers::list_load_tests))
        .route(
            "/loadtest/scenarios/{scenario_id}/run",
            post(handlers::run_load_test),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use mocktool_caching::create_mock_cache;
    use mocktool_config::{CacheConfig, HttpConfig, LoadTestConfig};
    use mocktool_core::{LoadTestScenario, LoadTestStep, MockApi, Scenario};
    use mocktool_loadtest::{LoadRunner, StepExecutor};
    use mocktool_storage::{
        InMemoryStore, LoadTestScenarioRepository, MockApiRepository, ScenarioRepository,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct Harness {
        app: Router,
        services: ServiceContainer,
        global: Scenario,
        vip: Scenario,
    }

    async fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let global = store
            .create_scenario(Scenario::new("payments", "happy"))
            .await
            .unwrap();
        let vip = store
            .create_scenario(Scenario::new("payments", "vip"))
            .await
            .unwrap();

        store
            .create_mock_api(
                MockApi::new("payments", "happy", "/charge", "POST", json!({"amount": 10}), json!({"status": "ok"}))
                    .with_headers(json!({"X-Api-Version": "2", "Set-Cookie": "a=b"})),
            )
            .await
            .unwrap();
        store
            .create_mock_api(MockApi::new(
                "payments",
                "vip",
                "/charge",
                "POST",
                json!({"amount": 10}),
                json!({"status": "vip"}),
            ))
            .await
            .unwrap();
        store
            .create_mock_api(MockApi::new(
                "payments",
                "happy",
                "/status?a=1&b=2",
                "GET",
                Value::Null,
                json!({"up": true}),
            ))
            .await
            .unwrap();

        let executor =
            StepExecutor::from_config(&HttpConfig::default(), &LoadTestConfig::default()).unwrap();
        let runner = LoadRunner::new(Arc::new(executor), 8);
        let services = ServiceContainer::with_components(
            store,
            create_mock_cache(&CacheConfig::default()),
            runner,
        );
        let app = create_app(services.clone(), &ServerConfig::default());

        Harness {
            app,
            services,
            global,
            vip,
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn charge(account: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/forward/charge")
            .header("X-Account-Id", account)
            .header("X-Feature-Name", "payments")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"amount":10}"#))
            .unwrap()
    }

    fn activate_uri(id: Uuid, account: Option<&str>) -> String {
        match account {
            Some(account) => format!("/api/v1/mocktool/scenarios/{}/activate?account_id={}", id, account),
            None => format!("/api/v1/mocktool/scenarios/{}/activate", id),
        }
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let h = harness().await;

        let (status, body) = send(&h.app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "mocktool"}));

        let (status, body) = send(&h.app, Request::get("/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "connected");

        h.services.store.set_healthy(false);
        let (status, body) = send(&h.app, Request::get("/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["error"], "database connection failed");
    }

    #[tokio::test]
    async fn test_forward_before_activation_has_no_scenario() {
        let h = harness().await;

        let (status, body) = send(&h.app, charge("acct-1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], "NO_ACTIVE_SCENARIO");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_forward_serves_active_scenario_and_override() {
        let h = harness().await;

        let (status, body) = send(&h.app, post(&activate_uri(h.global.id, None))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "scenario activated successfully");

        let response = h.app.clone().oneshot(charge("acct-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["x-api-version"], "2");
        assert!(response.headers().get("set-cookie").is_none());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({"status": "ok"}));

        send(&h.app, post(&activate_uri(h.vip.id, Some("acct-vip")))).await;

        let (_, body) = send(&h.app, charge("acct-vip")).await;
        assert_eq!(body, json!({"status": "vip"}));
        let (_, body) = send(&h.app, charge("acct-1")).await;
        assert_eq!(body, json!({"status": "ok"}));

        let (status, body) = send(
            &h.app,
            Request::get("/api/v1/mocktool/scenarios/active?feature_name=payments&account_id=acct-vip")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scenario_name"], "vip");
        assert_eq!(body["account_id"], "acct-vip");

        let (status, body) = send(
            &h.app,
            Request::delete(format!(
                "/api/v1/mocktool/scenarios/{}/deactivate?account_id=acct-vip",
                h.vip.id
            ))
            .body(Body::empty())
            .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "scenario deactivated successfully");

        let (_, body) = send(&h.app, charge("acct-vip")).await;
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_forward_errors() {
        let h = harness().await;
        send(&h.app, post(&activate_uri(h.global.id, None))).await;

        let missing_account = Request::post("/forward/charge")
            .header("X-Feature-Name", "payments")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, missing_account).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "X-Account-Id required");
        assert_eq!(body["grpc_code"], 3);

        let bad_json = Request::post("/forward/charge")
            .header("X-Account-Id", "acct-1")
            .header("X-Feature-Name", "payments")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(&h.app, bad_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "invalid JSON body");

        let unknown = Request::post("/forward/refund")
            .header("X-Account-Id", "acct-1")
            .header("X-Feature-Name", "payments")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&h.app, unknown).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_code"], "ERR.001");
        assert_eq!(body["details"]["x-trace-id"], body["trace_id"]);
        assert!(!body["trace_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_public_forward_sorts_query() {
        let h = harness().await;
        send(&h.app, post(&activate_uri(h.global.id, None))).await;

        let request = Request::get("/public/forward/status?b=2&a=1")
            .header("X-Feature-Name", "payments")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"up": true}));

        let missing_feature = Request::get("/public/forward/status").body(Body::empty()).unwrap();
        let (status, body) = send(&h.app, missing_feature).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "X-Feature-Name required");
    }

    #[tokio::test]
    async fn test_activation_validation() {
        let h = harness().await;

        let (status, body) = send(&h.app, post("/api/v1/mocktool/scenarios/not-a-uuid/activate")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "invalid scenario_id");

        let (status, body) = send(&h.app, post(&activate_uri(Uuid::new_v4(), None))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_message"], "scenario not found");

        let (status, body) = send(
            &h.app,
            Request::get("/api/v1/mocktool/scenarios/active").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "feature_name is required");
    }

    #[tokio::test]
    async fn test_run_load_test_validation() {
        let h = harness().await;
        let store = &h.services.store;

        let mut inactive = LoadTestScenario::new("inactive", vec![LoadTestStep::default()]);
        inactive.accounts = "u-p".to_string();
        inactive.is_active = false;
        let inactive = store.create_load_test_scenario(inactive).await.unwrap();

        let no_accounts = store
            .create_load_test_scenario(LoadTestScenario::new("no-accounts", Vec::new()))
            .await
            .unwrap();

        let mut garbled = LoadTestScenario::new("garbled", Vec::new());
        garbled.accounts = "nodash,too-many-dashes".to_string();
        let garbled = store.create_load_test_scenario(garbled).await.unwrap();

        let run = |id: Uuid| post(&format!("/api/v1/mocktool/loadtest/scenarios/{}/run", id));

        let (status, body) = send(&h.app, run(inactive.id)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_message"], "scenario is not active");

        let (_, body) = send(&h.app, run(no_accounts.id)).await;
        assert_eq!(body["error_message"], "no accounts configured for this scenario");

        let (_, body) = send(&h.app, run(garbled.id)).await;
        assert_eq!(body["error_message"], "failed to parse accounts");

        let (status, _) = send(&h.app, run(Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &h.app,
            Request::get("/api/v1/mocktool/loadtest/scenarios").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_metrics_count_lookups() {
        let h = harness().await;
        send(&h.app, post(&activate_uri(h.global.id, None))).await;
        send(&h.app, charge("acct-1")).await;
        send(&h.app, charge("acct-1")).await;

        let (status, body) = send(&h.app, Request::get("/metrics").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resolver"]["cache_hits"], 1);
        assert_eq!(body["resolver"]["cache_misses"], 1);
        assert_eq!(body["resolver"]["lookups_found"], 1);
        assert_eq!(body["resolver"]["resolve_duration_seconds"]["total_count"], 2);
        assert!(body["cache"]["entry_count"].is_number());
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(
                Request::get("/health")
                    .header("X-Request-ID", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
