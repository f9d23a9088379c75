//! Cache contract consumed by the resolver and scenario administration

use async_trait::async_trait;

use crate::{CacheResult, CacheStats};

/// String-valued cache keyed by the `mocktool:*` namespace
#[async_trait]
pub trait MockCache: Send + Sync {
    /// Read a key; `Ok(None)` is a miss
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Write a key; expiry follows the cache's own policy
    async fn set(&self, key: &str, value: String) -> CacheResult<()>;

    /// Drop every key matching the glob `pattern`, returning how many were removed
    async fn invalidate_all(&self, pattern: &str) -> CacheResult<u64>;

    /// Current statistics
    async fn stats(&self) -> CacheStats;
}
