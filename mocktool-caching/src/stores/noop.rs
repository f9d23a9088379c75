//! Cache that stores nothing, used when caching is disabled

use async_trait::async_trait;

use crate::stats::{create_stats_collector, SharedStatsCollector};
use crate::{CacheResult, CacheStats, MockCache};

/// Every read misses and every write is discarded
#[derive(Debug, Default)]
pub struct NoopMockCache {
    stats: SharedStatsCollector,
}

impl NoopMockCache {
    pub fn new() -> Self {
        Self {
            stats: create_stats_collector(),
        }
    }
}

#[async_trait]
impl MockCache for NoopMockCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        self.stats.record_miss();
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate_all(&self, _pattern: &str) -> CacheResult<u64> {
        Ok(0)
    }

    async fn stats(&self) -> CacheStats {
        self.stats.get_stats(0)
    }
}
