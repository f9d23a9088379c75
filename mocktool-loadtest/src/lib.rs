//! Scenario-driven load runner
//!
//! A scenario is an ordered list of HTTP steps. The runner executes it once
//! per account across a bounded pool of workers. Each account gets its own
//! variable scope, seeded with `username` and `password` and extended by the
//! `save_variables` directives of successful steps. Steps can be guarded by a
//! condition and can be written as an inline `curl` command.

pub mod account;
pub mod condition;
pub mod curl;
pub mod error;
pub mod executor;
pub mod extract;
pub mod placeholder;
pub mod result;
pub mod runner;
pub mod scenario;

pub use account::run_account;
pub use condition::evaluate_condition;
pub use curl::{is_curl_command, parse_curl, CurlRequest};
pub use error::{LoadResult, LoadTestError};
pub use executor::StepExecutor;
pub use extract::{extract_variables, json_path};
pub use placeholder::replace_placeholders;
pub use result::{AccountResult, LoadTestResult, StepResult};
pub use runner::LoadRunner;
pub use scenario::{load_scenario_file, parse_accounts, Account, Scenario};

/// Variables visible to one account's steps
pub type Scope = std::collections::HashMap<String, String>;
