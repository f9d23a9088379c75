//! Load runner configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadTestConfig {
    /// Pause between retry attempts of a failing step
    #[serde(
        with = "crate::domains::utils::serde_duration_millis",
        default = "default_retry_interval"
    )]
    pub retry_interval: Duration,

    /// Upper bound on worker count regardless of scenario concurrency
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            retry_interval: default_retry_interval(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Validatable for LoadTestConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.max_concurrency, "max_concurrency", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "loadtest"
    }
}

fn default_retry_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_concurrency() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loadtest_defaults() {
        let config = LoadTestConfig::default();
        assert_eq!(config.retry_interval, Duration::from_secs(1));
        assert_eq!(config.max_concurrency, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_interval_is_read_as_millis() {
        let config: LoadTestConfig = serde_yaml::from_str("retry_interval: 250").unwrap();
        assert_eq!(config.retry_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = LoadTestConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
