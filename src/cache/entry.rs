//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access
//! metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::cache::estimate_size;

// == Cache Entry ==
/// Represents a single cache entry with value and lifecycle metadata.
///
/// `size_bytes` is computed once at construction and never mutated;
/// replacing a key creates a new entry rather than resizing the old one.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: Value,
    /// Time-to-live in seconds from creation
    pub ttl_seconds: u64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Last access timestamp (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Number of successful reads of this entry
    pub access_count: u64,
    /// Estimated size of the value in bytes
    pub size_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry, eagerly estimating the value's size.
    pub fn new(key: String, value: Value, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        let size_bytes = estimate_size(&value);

        Self {
            key,
            value,
            ttl_seconds,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
            size_bytes,
        }
    }

    // == Touch ==
    /// Records a successful read: bumps the access count and refreshes the
    /// last-access timestamp. Does not extend the TTL.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Expiry is a pure function of wall-clock time versus
    /// `created_at + ttl_seconds`; reads never reset it.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.created_at + self.ttl_seconds * 1000
    }

    // == Age ==
    /// Elapsed seconds since this entry was created.
    pub fn age_seconds(&self) -> f64 {
        current_timestamp_ms().saturating_sub(self.created_at) as f64 / 1000.0
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
