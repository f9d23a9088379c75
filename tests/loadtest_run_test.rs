//! Load tests driven against a running mock server
//!
//! The server under test doubles as the target: its forwarding endpoints
//! answer the scenario's steps, so login tokens flow through `save_variables`
//! into later steps exactly as they would against a real backend.

use anyhow::Result;
use mocktool_config::{HttpConfig, LoadTestConfig};
use mocktool_core::{LoadTestScenario, LoadTestStep};
use mocktool_integration_tests::TestServer;
use mocktool_loadtest::{parse_accounts, LoadRunner, LoadTestResult, Scenario, StepExecutor};
use mocktool_storage::LoadTestScenarioRepository;
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const FIXTURES: &str = r#"
scenarios:
  - feature: auth
    name: default
mock_apis:
  - feature: auth
    scenario: default
    path: /auth/login
    method: POST
    input: {"client": "web"}
    output: {"data": {"token": "tkn-1"}}
  - feature: auth
    scenario: default
    path: /auth/profile
    method: GET
    output: {"plan": "gold"}
activations:
  - feature: auth
    scenario: default
"#;

fn auth_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("X-Account-Id".to_string(), "{{username}}".to_string()),
        ("X-Feature-Name".to_string(), "auth".to_string()),
    ])
}

fn login_step(server: &TestServer) -> LoadTestStep {
    LoadTestStep {
        name: "login".to_string(),
        method: "POST".to_string(),
        path: server.url("/forward/auth/login"),
        headers: auth_headers(),
        body: r#"{"client":"web"}"#.to_string(),
        save_variables: BTreeMap::from([("token".to_string(), "data.token".to_string())]),
        expect_status: 200,
        ..Default::default()
    }
}

fn profile_step(server: &TestServer) -> LoadTestStep {
    LoadTestStep {
        name: "profile".to_string(),
        path: format!(
            "curl '{}' -H 'X-Account-Id: {{{{username}}}}' -H 'X-Feature-Name: auth' -H 'Authorization: Bearer {{{{token}}}}'",
            server.url("/forward/auth/profile")
        ),
        save_variables: BTreeMap::from([("plan".to_string(), "plan".to_string())]),
        expect_status: 200,
        condition: "{{token}} == tkn-1".to_string(),
        ..Default::default()
    }
}

fn skipped_step(server: &TestServer) -> LoadTestStep {
    LoadTestStep {
        name: "upgrade".to_string(),
        method: "POST".to_string(),
        path: server.url("/forward/auth/upgrade"),
        condition: "{{plan}} == silver".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_stored_scenario_over_http() -> Result<()> {
    let server = TestServer::start(FIXTURES).await?;

    let mut stored = LoadTestScenario::new(
        "login-and-profile",
        vec![login_step(&server), profile_step(&server), skipped_step(&server)],
    );
    stored.concurrency = 2;
    stored.accounts = "alice-a1,bob-b2,carol-c3".to_string();
    let stored = server.services.store.create_load_test_scenario(stored).await?;

    let response = Client::new()
        .post(server.url(&format!(
            "/api/v1/mocktool/loadtest/scenarios/{}/run",
            stored.id
        )))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let result: LoadTestResult = response.json().await?;
    assert_eq!(result.scenario_name, "login-and-profile");
    assert_eq!(result.total_accounts, 3);
    assert_eq!(result.success_count, 3);
    assert_eq!(result.failure_count, 0);

    let mut usernames: Vec<&str> = result
        .account_results
        .iter()
        .map(|a| a.username.as_str())
        .collect();
    usernames.sort_unstable();
    assert_eq!(usernames, vec!["alice", "bob", "carol"]);

    for account in &result.account_results {
        let steps: Vec<&str> = account
            .step_results
            .iter()
            .map(|s| s.step_name.as_str())
            .collect();
        assert_eq!(steps, vec!["login", "profile"]);
        assert!(account.step_results.iter().all(|s| s.status_code == 200));
    }

    server.shutdown().await
}

#[tokio::test]
async fn test_failed_expectation_is_reported_per_account() -> Result<()> {
    let server = TestServer::start(FIXTURES).await?;

    let mut wrong_status = login_step(&server);
    wrong_status.expect_status = 201;
    let scenario = Scenario {
        name: "strict-login".to_string(),
        concurrency: 2,
        accounts: String::new(),
        steps: vec![wrong_status, profile_step(&server)],
    };

    let loadtest = LoadTestConfig {
        retry_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let executor = StepExecutor::from_config(&HttpConfig::default(), &loadtest)?;
    let runner = LoadRunner::new(Arc::new(executor), loadtest.max_concurrency);

    let result = runner
        .run(&scenario, parse_accounts("alice-a1,bob-b2"))
        .await;

    assert_eq!(result.total_accounts, 2);
    assert_eq!(result.failure_count, 2);
    for account in &result.account_results {
        assert!(!account.success);
        // The failing step ends the account's run
        assert_eq!(account.step_results.len(), 1);
        let step = &account.step_results[0];
        assert_eq!(step.status_code, 200);
        assert!(step
            .error_message
            .as_deref()
            .unwrap_or_default()
            .starts_with("expected status 201, got 200"));
    }

    let summary = result.render_summary();
    assert!(summary.contains("strict-login"));
    assert!(summary.contains("alice"));

    server.shutdown().await
}

#[tokio::test]
async fn test_yaml_scenario_against_server() -> Result<()> {
    let server = TestServer::start(FIXTURES).await?;

    let yaml = format!(
        r#"
concurrency: 1
accounts: "dave-d4"
steps:
  - name: login
    method: POST
    path: "{login}"
    headers:
      X-Account-Id: "{{{{username}}}}"
      X-Feature-Name: auth
    body: '{{"client":"web"}}'
    save_variables:
      token: data.token
    expect_status: 200
"#,
        login = server.url("/forward/auth/login")
    );
    let scenario = Scenario::from_yaml(&yaml, "yaml-login")?;
    assert_eq!(scenario.name, "yaml-login");

    let executor = StepExecutor::from_config(&HttpConfig::default(), &LoadTestConfig::default())?;
    let runner = LoadRunner::new(Arc::new(executor), 4);
    let result = runner
        .run(&scenario, parse_accounts(&scenario.accounts))
        .await;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.account_results[0].username, "dave");

    server.shutdown().await
}
