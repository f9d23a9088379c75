//! Resolver metrics
//!
//! Counters are plain atomics owned by a [`ResolverMetrics`] value handed to
//! the resolver at construction, so tests can observe a fresh set.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lookup latency bucket boundaries in seconds
pub const LOOKUP_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5];

/// Outcome label of a store lookup
pub const STATUS_FOUND: &str = "found";
pub const STATUS_NOT_FOUND: &str = "not_found";

/// Histogram with fixed bucket boundaries plus an overflow bucket
#[derive(Debug)]
pub struct Histogram {
    buckets: Vec<f64>,
    counts: Vec<AtomicU64>,
    total_count: AtomicU64,
    sum_us: AtomicU64,
}

impl Histogram {
    pub fn new(buckets: &[f64]) -> Self {
        let counts = (0..buckets.len() + 1).map(|_| AtomicU64::new(0)).collect();
        Self {
            buckets: buckets.to_vec(),
            counts,
            total_count: AtomicU64::new(0),
            sum_us: AtomicU64::new(0),
        }
    }

    pub fn observe(&self, value: Duration) {
        let seconds = value.as_secs_f64();
        let index = self
            .buckets
            .iter()
            .position(|&boundary| seconds <= boundary)
            .unwrap_or(self.buckets.len());

        self.counts[index].fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
        self.sum_us
            .fetch_add(value.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            buckets: self.buckets.clone(),
            counts: self
                .counts
                .iter()
                .map(|c| c.load(Ordering::Relaxed))
                .collect(),
            total_count: self.total_count.load(Ordering::Relaxed),
            sum_seconds: self.sum_us.load(Ordering::Relaxed) as f64 / 1_000_000.0,
        }
    }
}

/// Serializable histogram state; `counts` has one more entry than `buckets`
#[derive(Debug, Clone, Serialize)]
pub struct HistogramSnapshot {
    pub buckets: Vec<f64>,
    pub counts: Vec<u64>,
    pub total_count: u64,
    pub sum_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupCount {
    pub feature: String,
    pub scenario: String,
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub resolve_duration_seconds: HistogramSnapshot,
    pub lookups_found: u64,
    pub lookups_not_found: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub lookups: Vec<LookupCount>,
}

/// Counters recorded by the mock resolver
#[derive(Debug)]
pub struct ResolverMetrics {
    resolve_duration: Histogram,
    lookups_found: AtomicU64,
    lookups_not_found: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    lookups: Mutex<HashMap<(String, String, &'static str), u64>>,
}

impl Default for ResolverMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self {
            resolve_duration: Histogram::new(LOOKUP_BUCKETS),
            lookups_found: AtomicU64::new(0),
            lookups_not_found: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            lookups: Mutex::new(HashMap::new()),
        }
    }

    pub fn observe_resolve(&self, elapsed: Duration) {
        self.resolve_duration.observe(elapsed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one store lookup for `(feature, scenario)`
    pub fn record_lookup(&self, feature: &str, scenario: &str, found: bool) {
        let status = if found {
            self.lookups_found.fetch_add(1, Ordering::Relaxed);
            STATUS_FOUND
        } else {
            self.lookups_not_found.fetch_add(1, Ordering::Relaxed);
            STATUS_NOT_FOUND
        };

        *self
            .lookups
            .lock()
            .entry((feature.to_string(), scenario.to_string(), status))
            .or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut lookups: Vec<LookupCount> = self
            .lookups
            .lock()
            .iter()
            .map(|((feature, scenario, status), count)| LookupCount {
                feature: feature.clone(),
                scenario: scenario.clone(),
                status: status.to_string(),
                count: *count,
            })
            .collect();
        lookups.sort_by(|a, b| {
            (&a.feature, &a.scenario, &a.status).cmp(&(&b.feature, &b.scenario, &b.status))
        });

        MetricsSnapshot {
            resolve_duration_seconds: self.resolve_duration.snapshot(),
            lookups_found: self.lookups_found.load(Ordering::Relaxed),
            lookups_not_found: self.lookups_not_found.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            lookups,
        }
    }
}
