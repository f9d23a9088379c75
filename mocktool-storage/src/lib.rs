//! Storage abstraction for mocktool
//!
//! The resolver and the admin surface talk to storage through the async
//! repository traits in [`repositories`]. [`InMemoryStore`] implements all of
//! them and can be seeded from a YAML or JSON fixture file.

pub mod error;
pub mod fixtures;
pub mod memory;
pub mod repositories;

pub use error::{StorageError, StorageResult};
pub use fixtures::{load_fixtures, FixtureFile, SeedSummary};
pub use memory::InMemoryStore;
pub use repositories::{
    AccountScenarioRepository, FeatureRepository, LoadTestScenarioRepository, MockApiRepository,
    Repository, ScenarioRepository,
};
