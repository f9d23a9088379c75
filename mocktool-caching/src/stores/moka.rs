//! Moka-based mock response cache

use async_trait::async_trait;
use glob::Pattern;
use moka::future::Cache as MokaInner;
use mocktool_config::CacheConfig;
use std::time::{Duration, Instant};

use crate::{
    stats::{create_stats_collector, SharedStatsCollector},
    CacheError, CacheResult, CacheStats, MockCache,
};

/// Moka-backed cache with optional time-to-live
pub struct MokaMockCache {
    inner: MokaInner<String, String>,
    stats: SharedStatsCollector,
}

impl MokaMockCache {
    /// Create a cache bounded by `max_capacity`; entries never expire when `ttl` is `None`
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaInner::builder().max_capacity(max_capacity);

        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            inner: builder.build(),
            stats: create_stats_collector(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity, config.ttl)
    }

    /// Flush moka's pending maintenance (expiry, eviction, counts)
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl MockCache for MokaMockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let start = Instant::now();

        let result = self.inner.get(key).await;

        if result.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        self.stats
            .record_get_latency(start.elapsed().as_nanos() as u64);

        Ok(result)
    }

    async fn set(&self, key: &str, value: String) -> CacheResult<()> {
        self.inner.insert(key.to_string(), value).await;
        self.stats.record_set();
        Ok(())
    }

    async fn invalidate_all(&self, pattern: &str) -> CacheResult<u64> {
        let matcher = Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, _)| matcher.matches(key.as_str()))
            .map(|(key, _)| key.to_string())
            .collect();

        let mut removed = 0;
        for key in keys {
            if self.inner.remove(&key).await.is_some() {
                removed += 1;
            }
        }

        self.stats.record_invalidated(removed);
        tracing::debug!(pattern, removed, "Invalidated cache entries");

        Ok(removed)
    }

    async fn stats(&self) -> CacheStats {
        self.sync().await;
        self.stats.get_stats(self.inner.entry_count())
    }
}
