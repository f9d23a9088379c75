//! Cache error types

use thiserror::Error;

/// Result type for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Cache-related errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Invalidation pattern is not a valid glob
    #[error("Invalid cache pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Backend-specific error
    #[error("Cache backend error: {0}")]
    BackendError(String),
}
