//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mock HTTP server and scenario load tester", long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML or JSON)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the mock server
    Serve {
        /// Address to bind, overriding `server.bind_address`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Port to listen on, overriding `server.port`
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,

        /// Fixture file to seed the store from
        #[arg(long, value_name = "FILE")]
        fixtures: Option<PathBuf>,
    },

    /// Run a YAML load-test scenario without starting a server
    Loadtest {
        /// Scenario file
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Accounts as `user1-pass1,user2-pass2`; defaults to the file's `accounts`
        #[arg(long, value_name = "ACCOUNTS")]
        accounts: Option<String>,

        /// Worker count, overriding the scenario's `concurrency`
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Print the result as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as YAML and exit
    PrintConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "mocktool",
            "serve",
            "--port",
            "9090",
            "--fixtures",
            "fixtures.yaml",
            "--config",
            "mocktool.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("mocktool.yaml")));
        match cli.command {
            Commands::Serve {
                bind,
                port,
                fixtures,
            } => {
                assert_eq!(bind, None);
                assert_eq!(port, Some(9090));
                assert_eq!(fixtures, Some(PathBuf::from("fixtures.yaml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_loadtest() {
        let cli = Cli::try_parse_from([
            "mocktool",
            "loadtest",
            "--file",
            "checkout.yaml",
            "--accounts",
            "alice-a1,bob-b2",
            "--concurrency",
            "4",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Loadtest {
                file,
                accounts,
                concurrency,
                json,
            } => {
                assert_eq!(file, PathBuf::from("checkout.yaml"));
                assert_eq!(accounts.as_deref(), Some("alice-a1,bob-b2"));
                assert_eq!(concurrency, Some(4));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_loadtest_requires_file() {
        assert!(Cli::try_parse_from(["mocktool", "loadtest"]).is_err());
        assert!(Cli::try_parse_from(["mocktool"]).is_err());
    }
}
