//! Logging setup for mocktool
//!
//! Everything logs through `tracing`; this crate only decides how the global
//! subscriber renders events (text, JSON, compact or pretty) and which
//! targets are filtered in.

pub mod init;

pub use init::{build_env_filter, filter_directives, init_logging_from_config, init_simple_tracing};
