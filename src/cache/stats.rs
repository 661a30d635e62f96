//! Cache Statistics Module
//!
//! Running counters plus the serializable snapshot and maintenance reports
//! returned by the cache's observability surface.

use serde::Serialize;

// == Cache Counters ==
/// Monotonic counters maintained by the cache engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct CacheCounters {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries removed by the eviction pass
    pub evictions: u64,
    /// Number of expired-entry sweeps performed
    pub cleanups: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    pub fn record_cleanup(&mut self) {
        self.cleanups += 1;
    }

    /// Hit rate as a percentage, 0.0 when no lookups have happened.
    pub fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of cache state and performance, taken atomically under
/// the cache lock.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Number of entries removed by eviction
    pub evictions: u64,
    /// Number of expired-entry sweeps performed
    pub cleanups: u64,
    /// Current number of entries
    pub entry_count: usize,
    /// Estimated memory held by stored values, in megabytes
    pub memory_estimate_mb: f64,
    /// hits / (hits + misses), as a percentage
    pub hit_rate_percent: f64,
    /// Estimated memory as a percentage of the budget
    pub memory_utilization_percent: f64,
    /// Entry count as a percentage of the ceiling
    pub entry_utilization_percent: f64,
}

// == Cleanup Report ==
/// Result of a forced expired-entry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    /// Entries removed by the sweep
    pub removed: usize,
    /// Entries remaining afterwards
    pub remaining: usize,
}

// == Optimize Report ==
/// Result of a cleanup-plus-compaction pass.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    /// Entry count before the pass
    pub entries_before: usize,
    /// Entry count after the pass
    pub entries_after: usize,
    /// Estimated memory before the pass, in megabytes
    pub memory_before_mb: f64,
    /// Estimated memory after the pass, in megabytes
    pub memory_after_mb: f64,
    /// Estimated megabytes freed
    pub freed_mb: f64,
}
