//! Forwarded request resolution

use mocktool_caching::{mock_api_key, MockCache};
use mocktool_core::{canonical_hash, sanitize_headers, MockError, MockResult};
use mocktool_storage::MockApiRepository;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::metrics::ResolverMetrics;
use crate::request::{compose_path, ForwardMode, ForwardRequest, MockResponse};
use crate::selector::ScenarioSelector;

/// Resolves forwarded requests against the cache and the mock store
#[derive(Clone)]
pub struct MockResolver {
    selector: ScenarioSelector,
    mock_apis: Arc<dyn MockApiRepository>,
    cache: Arc<dyn MockCache>,
    metrics: Arc<ResolverMetrics>,
}

impl MockResolver {
    pub fn new(
        selector: ScenarioSelector,
        mock_apis: Arc<dyn MockApiRepository>,
        cache: Arc<dyn MockCache>,
        metrics: Arc<ResolverMetrics>,
    ) -> Self {
        Self {
            selector,
            mock_apis,
            cache,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<ResolverMetrics> {
        &self.metrics
    }

    /// Resolve one forwarded request to its stored response
    pub async fn resolve(&self, request: &ForwardRequest) -> MockResult<MockResponse> {
        let start = Instant::now();
        let result = self.resolve_inner(request).await;
        self.metrics.observe_resolve(start.elapsed());
        result
    }

    async fn resolve_inner(&self, request: &ForwardRequest) -> MockResult<MockResponse> {
        let account_id = match request.mode {
            ForwardMode::Authenticated => Some(
                non_empty(request.account_id.as_deref())
                    .ok_or_else(|| MockError::bad_request("X-Account-Id required"))?,
            ),
            ForwardMode::Public => None,
        };
        let feature = non_empty(request.feature_name.as_deref())
            .ok_or_else(|| MockError::bad_request("X-Feature-Name required"))?;

        let path = compose_path(&request.path, request.raw_query.as_deref());

        info!(
            feature = %feature,
            account_id = account_id.unwrap_or_default(),
            path = %path,
            body_length = request.body.len(),
            "Received forwarded request"
        );

        let selected = self.selector.select(feature, account_id).await?;
        let scenario = selected.scenario.name.as_str();

        let hash = if request.body.is_empty() {
            String::new()
        } else {
            serde_json::from_slice::<Map<String, Value>>(&request.body)
                .map_err(|_| MockError::bad_request("invalid JSON body"))?;
            canonical_hash(&request.body)
        };

        let key = mock_api_key(feature, scenario, account_id, &path, &request.method, &hash);

        match self.cache.get(&key).await {
            Ok(Some(body)) => {
                self.metrics.record_cache_hit();
                debug!(key = %key, "Serving mock response from cache");
                let mut response = MockResponse::json(body);
                response.cached = true;
                return Ok(response);
            }
            Ok(None) => self.metrics.record_cache_miss(),
            Err(e) => {
                self.metrics.record_cache_miss();
                warn!(key = %key, error = %e, "Cache read failed");
            }
        }

        let mock = self
            .mock_apis
            .find_mock_api(feature, scenario, &path, &request.method, &hash)
            .await
            .map_err(|e| MockError::internal(format!("failed to query mock API: {}", e)))?;

        let Some(mock) = mock else {
            self.metrics.record_lookup(feature, scenario, false);
            let err = MockError::mock_not_found();
            warn!(
                feature = %feature,
                scenario = %scenario,
                path = %path,
                method = %request.method,
                trace_id = err.trace_id().unwrap_or_default(),
                "Mock API not found"
            );
            return Err(err);
        };
        self.metrics.record_lookup(feature, scenario, true);

        let body = match &mock.output {
            Value::Object(output) => serde_json::to_string(output)
                .map_err(|_| MockError::internal("failed to marshal output to JSON"))?,
            _ => return Err(MockError::internal("failed to parse output")),
        };

        let mut response = MockResponse::json(body);

        if let Some(headers) = &mock.headers {
            if let Ok(headers) = serde_json::from_value::<BTreeMap<String, String>>(headers.clone()) {
                response.headers.extend(sanitize_headers(&headers).headers);
            }
        }

        if let Err(e) = self.cache.set(&key, response.body.clone()).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }

        Ok(response)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
