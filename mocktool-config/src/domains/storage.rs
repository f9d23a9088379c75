//! Storage configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Optional YAML or JSON file used to seed the store at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_path: Option<String>,
}

impl Validatable for StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.fixtures_path {
            let lower = path.to_ascii_lowercase();
            if !(lower.ends_with(".yaml") || lower.ends_with(".yml") || lower.ends_with(".json")) {
                return Err(self.validation_error(format!(
                    "fixtures_path must point to a .yaml, .yml or .json file, got '{}'",
                    path
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "storage"
    }
}
