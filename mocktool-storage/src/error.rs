//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Referenced entity does not exist
    #[error("Entity not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness constraint violation
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Entity failed validation
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Backing store cannot serve requests
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// Fixture file is malformed or inconsistent
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StorageError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
