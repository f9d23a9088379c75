//! Load runner error types

use thiserror::Error;

pub type LoadResult<T> = std::result::Result<T, LoadTestError>;

#[derive(Debug, Error)]
pub enum LoadTestError {
    /// Placeholders whose names are not in the scope, in order of appearance
    #[error("missing variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    /// Unbalanced parentheses in a step condition
    #[error("Malformed expression")]
    MalformedExpression,

    #[error("empty curl command")]
    EmptyCurl,

    #[error("could not extract URL from curl command")]
    CurlWithoutUrl,

    #[error("failed to read scenario file: {0}")]
    ScenarioFile(#[source] std::io::Error),

    #[error("failed to parse scenario YAML: {0}")]
    ScenarioYaml(#[from] serde_yaml::Error),

    #[error("invalid account entry '{0}'")]
    InvalidAccount(String),

    #[error(transparent)]
    Http(#[from] mocktool_http::HttpError),
}
