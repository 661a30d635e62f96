//! Cache Store Module
//!
//! The eviction engine: HashMap storage plus recency tracking, enforcing an
//! entry-count ceiling and a soft memory budget with expiry-first LRU
//! eviction. One coarse mutex guards the whole structure; every public
//! operation locks for its full duration and is total - a failure inside the
//! cache degrades to a miss or a no-op, never an error.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    CacheCounters, CacheEntry, CacheStatsSnapshot, CleanupReport, OptimizeReport, RecencyList,
    MAX_EVICTIONS_PER_SET,
};
use crate::config::CacheConfig;

// == Bounded Cache ==
/// Memory-bounded cache with TTL expiration and LRU eviction.
///
/// All methods take `&self`; interior state lives behind a single mutex, so
/// one instance can be shared across request handlers via `Arc`. Critical
/// sections are short and CPU-bound: no I/O, no await points, no background
/// thread - expired-entry sweeps are amortized into `get`.
#[derive(Debug)]
pub struct BoundedCache {
    inner: Mutex<CacheInner>,
}

/// State guarded by the cache mutex.
#[derive(Debug)]
struct CacheInner {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access-order tracking for LRU eviction
    recency: RecencyList,
    /// Hit/miss/eviction/cleanup counters
    counters: CacheCounters,
    /// Running sum of entry size estimates
    memory_bytes: usize,
    /// Soft memory budget in bytes
    max_memory_bytes: usize,
    /// Entry-count ceiling
    max_entries: usize,
    /// Minimum interval between opportunistic sweeps
    cleanup_interval: Duration,
    /// When the last sweep ran
    last_cleanup: Instant,
}

impl BoundedCache {
    // == Constructors ==
    /// Creates a new cache with the given memory budget (MB), entry ceiling,
    /// and opportunistic sweep interval (seconds).
    pub fn new(max_memory_mb: usize, max_entries: usize, cleanup_interval_seconds: u64) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                recency: RecencyList::new(),
                counters: CacheCounters::default(),
                memory_bytes: 0,
                max_memory_bytes: max_memory_mb * 1024 * 1024,
                max_entries,
                cleanup_interval: Duration::from_secs(cleanup_interval_seconds),
                last_cleanup: Instant::now(),
            }),
        }
    }

    /// Creates a new cache from a [`CacheConfig`].
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(
            config.max_memory_mb,
            config.max_entries,
            config.cleanup_interval_seconds,
        )
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit touches the entry and promotes it to most-recently-used. An
    /// expired entry is removed and counted as a miss. If the cleanup
    /// interval has elapsed since the last sweep, a full expired-entry sweep
    /// runs first.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        inner.maybe_sweep();

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                inner.counters.record_miss();
                return None;
            }
        };

        if expired {
            inner.remove_entry(key);
            inner.counters.record_miss();
            return None;
        }

        let value = inner.entries.get_mut(key).map(|entry| {
            entry.touch();
            entry.value.clone()
        });
        if value.is_some() {
            inner.recency.promote(key);
            inner.counters.record_hit();
        }
        value
    }

    // == Set ==
    /// Stores a value under a key with the given TTL. Always succeeds.
    ///
    /// The entry's size is estimated eagerly. If the insertion would exceed
    /// the entry ceiling or the memory budget, expired entries and then LRU
    /// entries are evicted first. A single value larger than the entire
    /// budget is still admitted: the budget is a soft target enforced by
    /// evicting other entries, not an admission gate on the new one.
    pub fn set(&self, key: String, value: Value, ttl_seconds: u64) -> bool {
        let mut inner = self.lock();
        let entry = CacheEntry::new(key.clone(), value, ttl_seconds);

        // A replaced key gets a fresh entry; drop the old one first so its
        // size never leaks into the accounting.
        inner.remove_entry(&key);
        inner.ensure_capacity(entry.size_bytes);

        inner.memory_bytes += entry.size_bytes;
        inner.entries.insert(key.clone(), entry);
        inner.recency.promote(&key);
        true
    }

    // == Delete ==
    /// Removes an entry by key. Returns false if the key was absent;
    /// idempotent either way.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes all entries and resets size accounting. Counters survive.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.recency.clear();
        inner.memory_bytes = 0;
    }

    // == Invalidate By Prefix ==
    /// Removes every entry whose key starts with `prefix` and returns the
    /// number removed. The only sanctioned way to bulk-invalidate a family
    /// of keys.
    pub fn invalidate_by_prefix(&self, prefix: &str) -> usize {
        let mut inner = self.lock();
        let keys: Vec<String> = inner
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();

        for key in &keys {
            inner.remove_entry(key);
        }

        if !keys.is_empty() {
            debug!(prefix, removed = keys.len(), "invalidated key family");
        }
        keys.len()
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of counters and utilization.
    pub fn stats(&self) -> CacheStatsSnapshot {
        let inner = self.lock();
        let memory_estimate_mb = bytes_to_mb(inner.memory_bytes);
        CacheStatsSnapshot {
            hits: inner.counters.hits,
            misses: inner.counters.misses,
            evictions: inner.counters.evictions,
            cleanups: inner.counters.cleanups,
            entry_count: inner.entries.len(),
            memory_estimate_mb,
            hit_rate_percent: inner.counters.hit_rate_percent(),
            memory_utilization_percent: inner.memory_bytes as f64
                / inner.max_memory_bytes.max(1) as f64
                * 100.0,
            entry_utilization_percent: inner.entries.len() as f64
                / inner.max_entries.max(1) as f64
                * 100.0,
        }
    }

    // == Force Cleanup ==
    /// Sweeps all currently-expired entries regardless of the sweep timer.
    pub fn force_cleanup(&self) -> CleanupReport {
        let mut inner = self.lock();
        let removed = inner.sweep_expired();
        inner.counters.record_cleanup();
        CleanupReport {
            removed,
            remaining: inner.entries.len(),
        }
    }

    // == Optimize ==
    /// Sweeps expired entries and releases spare backing capacity.
    pub fn optimize(&self) -> OptimizeReport {
        let mut inner = self.lock();
        let entries_before = inner.entries.len();
        let memory_before_mb = bytes_to_mb(inner.memory_bytes);

        inner.sweep_expired();
        inner.entries.shrink_to_fit();
        inner.recency.shrink_to_fit();

        let memory_after_mb = bytes_to_mb(inner.memory_bytes);
        OptimizeReport {
            entries_before,
            entries_after: inner.entries.len(),
            memory_before_mb,
            memory_after_mb,
            freed_mb: memory_before_mb - memory_after_mb,
        }
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // == Lock ==
    /// Acquires the cache mutex, recovering from poisoning.
    ///
    /// A poisoned lock only means some holder panicked mid-operation; the
    /// cache keeps serving from the recovered state rather than propagating
    /// the panic - a stale or missing entry is correctness-neutral here.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("cache mutex was poisoned; continuing with recovered state");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for BoundedCache {
    fn default() -> Self {
        Self::with_config(&CacheConfig::default())
    }
}

impl CacheInner {
    /// Removes one entry, keeping recency order and memory accounting in
    /// sync. Returns the removed entry, if any.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.recency.forget(key);
        self.memory_bytes = self.memory_bytes.saturating_sub(entry.size_bytes);
        Some(entry)
    }

    /// Makes room for an insertion of `required` bytes.
    ///
    /// Runs only when the insertion would exceed the entry ceiling or the
    /// memory budget. Expired entries are reclaimed first (no information
    /// loss - they are logically gone already), then LRU entries are evicted
    /// until the count is under the ceiling and the freed size covers the
    /// new entry, capped at [`MAX_EVICTIONS_PER_SET`] removals.
    fn ensure_capacity(&mut self, required: usize) {
        if self.entries.len() < self.max_entries
            && self.memory_bytes + required <= self.max_memory_bytes
        {
            return;
        }

        let mut removed = 0usize;
        let mut freed = 0usize;

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired_keys {
            if let Some(entry) = self.remove_entry(&key) {
                freed += entry.size_bytes;
                removed += 1;
            }
        }

        while !self.entries.is_empty()
            && (self.entries.len() >= self.max_entries || freed < required)
        {
            if removed >= MAX_EVICTIONS_PER_SET {
                warn!(
                    cap = MAX_EVICTIONS_PER_SET,
                    "eviction pass hit the removal safety cap"
                );
                break;
            }
            let lru_key = match self.recency.pop_lru() {
                Some(key) => key,
                None => break,
            };
            if let Some(entry) = self.entries.remove(&lru_key) {
                self.memory_bytes = self.memory_bytes.saturating_sub(entry.size_bytes);
                freed += entry.size_bytes;
                removed += 1;
            }
        }

        if removed > 0 {
            self.counters.record_evictions(removed as u64);
            debug!(removed, freed_bytes = freed, "evicted entries to make room");
        }
    }

    /// Removes all expired entries and returns how many were dropped.
    fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove_entry(&key);
        }

        if count > 0 {
            debug!(removed = count, "swept expired entries");
        }
        count
    }

    /// Runs a sweep if the configured interval has elapsed since the last
    /// one. Amortized maintenance - there is no background thread.
    fn maybe_sweep(&mut self) {
        if self.last_cleanup.elapsed() < self.cleanup_interval {
            return;
        }
        self.sweep_expired();
        self.last_cleanup = Instant::now();
        self.counters.record_cleanup();
    }
}

/// Converts a byte count to megabytes.
fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
