//! Domain-driven configuration management for mocktool
//!
//! Configuration is split by functional domain (server, cache, storage,
//! outbound HTTP, logging, load testing). Every domain carries defaults,
//! validation and `MOCKTOOL_*` environment overrides.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    cache::CacheConfig, http::HttpConfig, loadtest::LoadTestConfig, logging::LoggingConfig,
    server::ServerConfig, storage::StorageConfig, MocktoolConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
