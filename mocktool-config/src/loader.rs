//! Configuration loading and environment variable handling

use crate::domains::MocktoolConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the `MOCKTOOL` prefix
    pub fn new() -> Self {
        Self {
            prefix: "MOCKTOOL".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML (or JSON) file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<MocktoolConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: MocktoolConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<MocktoolConfig> {
        let mut config = MocktoolConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<MocktoolConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn apply_env_overrides(&self, config: &mut MocktoolConfig) -> ConfigResult<()> {
        self.apply_server_overrides(&mut config.server)?;
        self.apply_cache_overrides(&mut config.cache)?;
        self.apply_storage_overrides(&mut config.storage);
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_loadtest_overrides(&mut config.loadtest)?;
        Ok(())
    }

    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Some(port) = self.parse_env_var("SERVER_PORT")? {
            config.port = port;
        }

        if let Ok(prefix) = self.get_env_var("SERVER_API_PREFIX") {
            config.api_prefix = prefix;
        }

        Ok(())
    }

    fn apply_cache_overrides(
        &self,
        config: &mut crate::domains::cache::CacheConfig,
    ) -> ConfigResult<()> {
        if let Some(enabled) = self.parse_env_var("CACHE_ENABLED")? {
            config.enabled = enabled;
        }

        if let Some(seconds) = self.parse_env_var::<u64>("CACHE_TTL")? {
            // 0 means entries never expire
            config.ttl = (seconds > 0).then(|| Duration::from_secs(seconds));
        }

        if let Some(capacity) = self.parse_env_var("CACHE_MAX_CAPACITY")? {
            config.max_capacity = capacity;
        }

        Ok(())
    }

    fn apply_storage_overrides(&self, config: &mut crate::domains::storage::StorageConfig) {
        if let Ok(path) = self.get_env_var("FIXTURES_PATH") {
            config.fixtures_path = Some(path).filter(|p| !p.trim().is_empty());
        }
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Some(seconds) = self.parse_env_var("HTTP_TIMEOUT")? {
            config.timeout = Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Some(verify_ssl) = self.parse_env_var("HTTP_VERIFY_SSL")? {
            config.verify_ssl = verify_ssl;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn apply_loadtest_overrides(
        &self,
        config: &mut crate::domains::loadtest::LoadTestConfig,
    ) -> ConfigResult<()> {
        if let Some(millis) = self.parse_env_var("LOADTEST_RETRY_INTERVAL_MS")? {
            config.retry_interval = Duration::from_millis(millis);
        }

        if let Some(max) = self.parse_env_var("LOADTEST_MAX_CONCURRENCY")? {
            config.max_concurrency = max;
        }

        Ok(())
    }

    /// Read and parse a prefixed variable; absent variables yield `None`
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
