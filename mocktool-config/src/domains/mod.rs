//! Domain-specific configuration modules

pub mod cache;
pub mod http;
pub mod loadtest;
pub mod logging;
pub mod server;
pub mod storage;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main mocktool configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MocktoolConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Mock response cache configuration
    #[serde(default)]
    pub cache: cache::CacheConfig,

    /// Storage and fixture configuration
    #[serde(default)]
    pub storage: storage::StorageConfig,

    /// Outbound HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Load runner configuration
    #[serde(default)]
    pub loadtest: loadtest::LoadTestConfig,
}

impl MocktoolConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.cache.validate()?;
        self.storage.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.loadtest.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = MocktoolConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
