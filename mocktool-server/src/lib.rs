//! Mocktool server
//!
//! Serves stored mock responses on the forwarding endpoints, exposes the
//! scenario activation and load-test administration API, and wires the
//! resolver, cache, store and load runner together.

pub mod app;
pub mod handlers;
pub mod services;
pub mod startup;

// Re-export main components
pub use app::create_app;
pub use services::ServiceContainer;
pub use startup::Server;
