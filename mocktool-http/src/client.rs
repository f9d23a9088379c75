//! HTTP client construction

use crate::errors::{HttpError, HttpResult};
use crate::types::HttpMethod;
use mocktool_config::HttpConfig;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, RequestBuilder,
};
use std::str::FromStr;
use tracing::debug;

/// Create a client with the configured timeout, redirects and TLS policy
pub fn create_client(config: &HttpConfig) -> HttpResult<Client> {
    debug!(
        "Creating HTTP client with {}s timeout",
        config.timeout.as_secs()
    );

    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .danger_accept_invalid_certs(!config.verify_ssl)
        .redirect(reqwest::redirect::Policy::limited(
            config.max_redirects as usize,
        ))
        .build()?;

    Ok(client)
}

/// Build a request from already-interpolated step fields
///
/// Headers are applied in iteration order, so later entries replace earlier
/// ones with the same name. An empty body sends no body at all.
pub fn build_request<'a, I>(
    client: &Client,
    method: HttpMethod,
    url: &str,
    headers: I,
    body: &str,
) -> HttpResult<RequestBuilder>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let url = reqwest::Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))?;

    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_str(name)
            .map_err(|_| HttpError::InvalidHeaderName(name.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| HttpError::InvalidHeaderValue(name.to_string()))?;
        header_map.insert(header_name, header_value);
    }

    let mut request = client.request(method.into(), url).headers(header_map);
    if !body.is_empty() {
        request = request.body(body.to_string());
    }

    Ok(request)
}
