//! HTTP server configuration for the forwarding and admin endpoints

use crate::error::ConfigResult;
use crate::validation::{
    validate_port_range, validate_positive, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for the administrative API routes
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Enable CORS middleware
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_cors: bool,

    /// Enable request ID propagation
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_request_id: bool,

    /// Enable request tracing
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_tracing: bool,

    /// Time allowed for in-flight requests on shutdown
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight requests
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_cors_max_age"
    )]
    pub max_age: Duration,
}

impl ServerConfig {
    /// Address string suitable for binding a listener
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            enable_cors: true,
            enable_request_id: true,
            enable_tracing: true,
            shutdown_timeout: default_shutdown_timeout(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_port_range(self.port, "port", self.domain_name())?;

        if !self.api_prefix.starts_with('/') {
            return Err(self.validation_error(format!(
                "api_prefix must start with '/', got '{}'",
                self.api_prefix
            )));
        }

        self.cors.validate()?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

impl Validatable for CorsConfig {
    fn validate(&self) -> ConfigResult<()> {
        for origin in &self.allowed_origins {
            if origin != "*" && !origin.is_empty() {
                validate_url(origin, "allowed_origins", self.domain_name())?;
            }
        }

        validate_positive(self.max_age.as_secs(), "max_age", self.domain_name())?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.cors"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api/v1/mocktool".to_string()
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> Duration {
    Duration::from_secs(3600)
}
