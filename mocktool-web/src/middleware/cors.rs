use axum::http::{HeaderName, HeaderValue};
use mocktool_config::domains::server::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// CORS layer for the configured origins
///
/// Methods and request headers are unrestricted since forwarded calls carry
/// arbitrary verbs and routing headers. `X-Request-ID` is exposed.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin");
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(config.max_age)
}
