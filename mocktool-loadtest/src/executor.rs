//! Step execution: placeholder substitution, dispatch and retry

use mocktool_config::{HttpConfig, LoadTestConfig};
use mocktool_core::LoadTestStep;
use mocktool_http::{build_request, create_client, HttpMethod};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::curl::{build_curl_command, is_curl_command, parse_curl};
use crate::error::LoadResult;
use crate::extract::extract_variables;
use crate::placeholder::replace_placeholders;
use crate::result::StepResult;
use crate::Scope;

const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// A step with every placeholder resolved, ready to send
#[derive(Debug, Clone, PartialEq)]
struct PreparedRequest {
    method: String,
    url: String,
    /// Applied in order; later entries replace earlier ones
    headers: Vec<(String, String)>,
    body: String,
}

impl PreparedRequest {
    fn header_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Why an attempt did not succeed
struct AttemptFailure {
    status_code: u16,
    message: String,
}

/// Executes single scenario steps against live endpoints
#[derive(Debug, Clone)]
pub struct StepExecutor {
    client: Client,
    retry_interval: Duration,
}

impl StepExecutor {
    pub fn new(client: Client, retry_interval: Duration) -> Self {
        Self {
            client,
            retry_interval,
        }
    }

    pub fn from_config(http: &HttpConfig, loadtest: &LoadTestConfig) -> LoadResult<Self> {
        Ok(Self::new(create_client(http)?, loadtest.retry_interval))
    }

    /// Run one step, saving extracted variables into `scope` on success.
    ///
    /// Transport errors, unreadable bodies and unexpected statuses are
    /// retried while `retry_for_seconds` has not elapsed and fewer than
    /// `max_retry_times` attempts were made (0 means no cap). Placeholder
    /// and request-construction failures are never retried.
    pub async fn execute(&self, step: &LoadTestStep, scope: &mut Scope) -> StepResult {
        let start = Instant::now();

        let prepared = if is_curl_command(&step.path) {
            prepare_curl_step(step, scope)
        } else {
            prepare_step(step, scope)
        };
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(message) => return StepResult::failure(&step.name, 0, start.elapsed(), message),
        };

        let method = match HttpMethod::parse_or_default(&prepared.method) {
            Ok(method) => method,
            Err(e) => {
                return StepResult::failure(
                    &step.name,
                    0,
                    start.elapsed(),
                    format!("failed to create request: {}", e),
                )
            }
        };

        let deadline = start + Duration::from_secs(step.retry_for_seconds);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let attempt_start = Instant::now();

            debug!(
                step = %step.name,
                attempt,
                "{}",
                build_curl_command(
                    method.as_str(),
                    &prepared.url,
                    prepared.header_pairs(),
                    &prepared.body
                )
            );

            let request = match build_request(
                &self.client,
                method,
                &prepared.url,
                prepared.header_pairs(),
                &prepared.body,
            ) {
                Ok(request) => request,
                Err(e) => {
                    return StepResult::failure(
                        &step.name,
                        0,
                        start.elapsed(),
                        format!("failed to create request: {}", e),
                    )
                }
            };

            let failure = match request.send().await {
                Err(e) => AttemptFailure {
                    status_code: 0,
                    message: format!("request failed after {} attempt(s): {}", attempt, e),
                },
                Ok(response) => {
                    let status_code = response.status().as_u16();
                    let headers = response.headers().clone();
                    match response.text().await {
                        Err(e) => AttemptFailure {
                            status_code,
                            message: format!(
                                "failed to read response after {} attempt(s): {}",
                                attempt, e
                            ),
                        },
                        Ok(body) if step.expect_status > 0 && status_code != step.expect_status => {
                            AttemptFailure {
                                status_code,
                                message: format!(
                                    "expected status {}, got {} after {} attempt(s): {}",
                                    step.expect_status, status_code, attempt, body
                                ),
                            }
                        }
                        Ok(body) => {
                            let duration = attempt_start.elapsed();
                            extract_variables(&step.save_variables, &headers, &body, scope);
                            if step.wait_after_seconds > 0 {
                                sleep(Duration::from_secs(step.wait_after_seconds)).await;
                            }
                            return StepResult::success(&step.name, status_code, duration);
                        }
                    }
                }
            };

            let should_retry = step.retry_for_seconds > 0
                && Instant::now() < deadline
                && (step.max_retry_times == 0 || attempt < step.max_retry_times);

            if !should_retry {
                return StepResult::failure(
                    &step.name,
                    failure.status_code,
                    start.elapsed(),
                    failure.message,
                );
            }

            warn!(step = %step.name, attempt, "Step attempt failed, retrying: {}", failure.message);
            sleep(self.retry_interval).await;
        }
    }
}

fn interpolate(input: &str, scope: &Scope, what: &str) -> Result<String, String> {
    replace_placeholders(input, scope)
        .map_err(|e| format!("failed to replace placeholders in {}: {}", what, e))
}

fn baseline_headers() -> Vec<(String, String)> {
    vec![(CONTENT_TYPE.to_string(), JSON.to_string())]
}

fn prepare_step(step: &LoadTestStep, scope: &Scope) -> Result<PreparedRequest, String> {
    let url = interpolate(&step.path, scope, "path")?;
    let body = interpolate(&step.body, scope, "body")?;

    let mut headers = baseline_headers();
    for (name, value) in &step.headers {
        let value = interpolate(value, scope, &format!("header {}", name))?;
        headers.push((name.clone(), value));
    }

    Ok(PreparedRequest {
        method: step.method.clone(),
        url,
        headers,
        body,
    })
}

/// Curl fields act as defaults; non-empty step fields take precedence
fn prepare_curl_step(step: &LoadTestStep, scope: &Scope) -> Result<PreparedRequest, String> {
    let command = interpolate(&step.path, scope, "curl command")?;
    let curl = parse_curl(&command).map_err(|e| format!("failed to parse curl: {}", e))?;

    let url = interpolate(&curl.url, scope, "URL")?;
    let body = if step.body.is_empty() {
        curl.body
    } else {
        interpolate(&step.body, scope, "body")?
    };
    let method = if step.method.is_empty() {
        curl.method
    } else {
        step.method.clone()
    };

    let mut headers = baseline_headers();
    for (name, value) in &curl.headers {
        let value = interpolate(value, scope, &format!("curl header {}", name))?;
        headers.push((name.clone(), value));
    }
    for (name, value) in &step.headers {
        let value = interpolate(value, scope, &format!("step header {}", name))?;
        headers.push((name.clone(), value));
    }

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
    })
}
