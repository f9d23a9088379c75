//! Cache statistics

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    /// Total number of get requests
    pub total_gets: u64,

    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Total number of set requests
    pub total_sets: u64,

    /// Entries removed by pattern invalidation
    pub invalidated: u64,

    /// Current number of entries
    pub entry_count: u64,

    /// Hit rate (0.0 to 1.0)
    pub hit_rate: f64,

    /// Average get latency in microseconds
    pub avg_get_latency_us: Option<f64>,
}

/// Thread-safe statistics collector
#[derive(Debug, Default)]
pub struct StatsCollector {
    total_gets: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    total_sets: AtomicU64,
    invalidated: AtomicU64,
    total_get_latency_ns: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.total_gets.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.total_gets.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.total_sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidated(&self, count: u64) {
        self.invalidated.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_get_latency(&self, latency_ns: u64) {
        self.total_get_latency_ns
            .fetch_add(latency_ns, Ordering::Relaxed);
    }

    /// Snapshot the counters
    pub fn get_stats(&self, entry_count: u64) -> CacheStats {
        let total_gets = self.total_gets.load(Ordering::Relaxed);
        let hits = self.hits.load(Ordering::Relaxed);

        let hit_rate = if total_gets > 0 {
            hits as f64 / total_gets as f64
        } else {
            0.0
        };

        let avg_get_latency_us = (total_gets > 0).then(|| {
            self.total_get_latency_ns.load(Ordering::Relaxed) as f64 / total_gets as f64 / 1000.0
        });

        CacheStats {
            total_gets,
            hits,
            misses: self.misses.load(Ordering::Relaxed),
            total_sets: self.total_sets.load(Ordering::Relaxed),
            invalidated: self.invalidated.load(Ordering::Relaxed),
            entry_count,
            hit_rate,
            avg_get_latency_us,
        }
    }
}

/// Shared stats collector
pub type SharedStatsCollector = Arc<StatsCollector>;

/// Create a new shared stats collector
pub fn create_stats_collector() -> SharedStatsCollector {
    Arc::new(StatsCollector::new())
}
