//! Mocktool binary
//!
//! `serve` runs the mock server, `loadtest` runs a scenario file directly
//! against live endpoints and `print-config` shows the effective settings.

mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use mocktool_config::{ConfigLoader, MocktoolConfig};
use mocktool_loadtest::{parse_accounts, LoadRunner, Scenario, StepExecutor};
use mocktool_logging::{init_logging_from_config, init_simple_tracing};
use mocktool_server::Server;
use std::path::Path;
use std::sync::Arc;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load(cli.config.as_ref())
        .context("Failed to load configuration")?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.parse().map_err(|e: String| anyhow!(e))?;
    }

    match cli.command {
        Commands::Serve {
            bind,
            port,
            fixtures,
        } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(fixtures) = fixtures {
                config.storage.fixtures_path = Some(fixtures.display().to_string());
            }
            config
                .validate_all()
                .context("Invalid configuration after command line overrides")?;

            init_logging_from_config(&config.logging)?;
            Server::new(config).await?.start().await
        }
        Commands::Loadtest {
            file,
            accounts,
            concurrency,
            json,
        } => {
            init_simple_tracing(config.logging.level.as_str())?;
            run_load_test(&config, &file, accounts, concurrency, json).await
        }
        Commands::PrintConfig => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

async fn run_load_test(
    config: &MocktoolConfig,
    file: &Path,
    accounts: Option<String>,
    concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut scenario = Scenario::from_path(file)
        .with_context(|| format!("Failed to load scenario from {}", file.display()))?;
    if let Some(concurrency) = concurrency {
        scenario.concurrency = concurrency;
    }

    let accounts = parse_accounts(accounts.as_deref().unwrap_or(&scenario.accounts));
    if accounts.is_empty() {
        bail!("no accounts configured for scenario '{}'", scenario.name);
    }

    let executor = StepExecutor::from_config(&config.http, &config.loadtest)
        .context("Failed to create load test HTTP client")?;
    let runner = LoadRunner::new(Arc::new(executor), config.loadtest.max_concurrency);

    tracing::info!(
        scenario = %scenario.name,
        accounts = accounts.len(),
        "Starting load test"
    );
    let result = runner.run(&scenario, accounts).await;

    if json {
        println!("{}", result.to_json_pretty()?);
    } else {
        print!("{}", result.render_summary());
    }

    if result.failure_count > 0 {
        bail!(
            "{} of {} accounts failed",
            result.failure_count,
            result.total_accounts
        );
    }

    Ok(())
}
