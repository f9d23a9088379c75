use anyhow::{Context, Result};
use mocktool_config::domains::logging::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Directive string for the configured level plus any extra directives
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.to_string()];
    directives.extend(config.directives.iter().cloned());
    directives.join(",")
}

/// `RUST_LOG` wins when set, otherwise the configured directives apply
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = filter_directives(config);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter directives: {}", directives))
}

/// Initialize the global subscriber from configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let location = config.include_location;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(location)
        .with_line_number(location);

    // Use try_init to avoid panic if global subscriber already set
    let initialized = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Compact => builder.compact().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if initialized.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing on stderr, leaving stdout for command output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktool_config::domains::logging::LogLevel;

    #[test]
    fn test_filter_directives() {
        let mut config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), "info");

        config.level = LogLevel::Debug;
        config.directives = vec!["tower_http=warn".to_string(), "hyper=off".to_string()];
        assert_eq!(filter_directives(&config), "debug,tower_http=warn,hyper=off");
    }

    #[test]
    fn test_build_env_filter_from_config() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                directives: vec!["mocktool_loadtest=trace".to_string()],
                ..Default::default()
            };
            let filter = build_env_filter(&config).unwrap();
            assert!(filter.to_string().contains("mocktool_loadtest=trace"));
        });
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            let filter = build_env_filter(&LoggingConfig::default()).unwrap();
            assert_eq!(filter.to_string(), "warn");
        });
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig {
            format: LogFormat::Json,
            ..Default::default()
        };
        assert!(init_logging_from_config(&config).is_ok());
        assert!(init_logging_from_config(&LoggingConfig::default()).is_ok());
        assert!(init_simple_tracing("debug").is_ok());
    }
}
