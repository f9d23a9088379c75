//! Mock response cache for mocktool
//!
//! The resolver only needs three operations from its cache: read a key, write
//! a key, and drop every key matching a glob. This crate provides that
//! contract, a moka-backed implementation with optional TTL, a no-op variant
//! for when caching is switched off, and the key layout shared by readers and
//! invalidators.

pub mod cache;
pub mod errors;
pub mod keys;
pub mod stats;
pub mod stores;

use std::sync::Arc;

use mocktool_config::CacheConfig;

pub use cache::MockCache;
pub use errors::{CacheError, CacheResult};
pub use keys::{account_pattern, all_pattern, feature_pattern, mock_api_key, scenario_pattern};
pub use stats::CacheStats;
pub use stores::{MokaMockCache, NoopMockCache};

/// Build the cache described by configuration
pub fn create_mock_cache(config: &CacheConfig) -> Arc<dyn MockCache> {
    if config.enabled {
        Arc::new(MokaMockCache::from_config(config))
    } else {
        Arc::new(NoopMockCache::new())
    }
}
