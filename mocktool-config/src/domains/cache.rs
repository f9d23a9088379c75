//! Mock response cache configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether resolved mock responses are cached at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Maximum number of cached responses
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Entry time-to-live; entries live until evicted or invalidated when unset
    #[serde(
        with = "crate::domains::utils::serde_duration_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl: Option<Duration>,

    /// Drop every `mocktool:*` entry when the server starts
    #[serde(default = "crate::domains::utils::default_true")]
    pub invalidate_on_startup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: default_max_capacity(),
            ttl: None,
            invalidate_on_startup: true,
        }
    }
}

impl CacheConfig {
    /// Configuration suited to local development: small, short-lived entries
    pub fn development() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Some(Duration::from_secs(60)),
            ..Default::default()
        }
    }

    /// Configuration with caching switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }

        validate_positive(self.max_capacity, "max_capacity", self.domain_name())?;

        if let Some(ttl) = self.ttl {
            validate_positive(ttl.as_secs(), "ttl", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "cache"
    }
}

fn default_max_capacity() -> u64 {
    10_000
}
