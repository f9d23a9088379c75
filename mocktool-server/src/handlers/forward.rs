//! Forwarding endpoints serving stored mock responses

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use mocktool_resolver::{
    request::{ACCOUNT_ID_HEADER, FEATURE_NAME_HEADER},
    ForwardMode, ForwardRequest, MockResponse,
};
use mocktool_web::WebResult;
use tracing::warn;

use crate::services::ServiceContainer;

/// `ANY /forward/{*path}`; requires `X-Account-Id` and `X-Feature-Name`
pub async fn forward(
    State(ctx): State<ServiceContainer>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Response> {
    let request = forward_request(ForwardMode::Authenticated, method, &path, query, &headers, body);
    let response = ctx.resolver.resolve(&request).await?;
    Ok(render(response))
}

/// `ANY /public/forward/{*path}`; requires only `X-Feature-Name`
pub async fn public_forward(
    State(ctx): State<ServiceContainer>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Response> {
    let request = forward_request(ForwardMode::Public, method, &path, query, &headers, body);
    let response = ctx.resolver.resolve(&request).await?;
    Ok(render(response))
}

fn forward_request(
    mode: ForwardMode,
    method: Method,
    path: &str,
    query: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> ForwardRequest {
    let path = format!("/{}", path.trim_start_matches('/'));
    let mut request = ForwardRequest::new(mode, method.as_str(), path).with_body(body.to_vec());

    if let Some(query) = query {
        request = request.with_query(query);
    }
    if let Some(account) = header_str(headers, ACCOUNT_ID_HEADER) {
        request = request.with_account(account);
    }
    if let Some(feature) = header_str(headers, FEATURE_NAME_HEADER) {
        request = request.with_feature(feature);
    }

    request
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn render(mock: MockResponse) -> Response {
    let mut response = (StatusCode::OK, Body::from(mock.body)).into_response();

    for (name, value) in mock.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "Dropping response header that is not valid HTTP"),
        }
    }

    response
}
