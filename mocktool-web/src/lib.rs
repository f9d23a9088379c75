//! # Mocktool Web Utilities
//!
//! axum glue shared by the mocktool server: the error type every handler
//! returns, rendered as the mocktool error body, plus request-id and CORS
//! middleware.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn, routing::get, Router};
//! use mocktool_config::ServerConfig;
//! use mocktool_web::{cors_layer, request_id_middleware, WebResult};
//!
//! async fn ping() -> WebResult<&'static str> {
//!     Ok("pong")
//! }
//!
//! let config = ServerConfig::default();
//! let app: Router = Router::new()
//!     .route("/ping", get(ping))
//!     .layer(from_fn(request_id_middleware))
//!     .layer(cors_layer(&config.cors));
//! ```

pub mod errors;
pub mod middleware;

pub use errors::{WebError, WebResult};
pub use middleware::{cors_layer, request_id_middleware, RequestId, REQUEST_ID_HEADER};
