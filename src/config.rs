//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache construction parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Soft memory budget for stored values, in megabytes
    pub max_memory_mb: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Minimum interval in seconds between opportunistic expired-entry sweeps
    pub cleanup_interval_seconds: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_MEMORY_MB` - Memory budget in MB (default: 500)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 5000)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep interval in seconds (default: 300)
    pub fn from_env() -> Self {
        Self {
            max_memory_mb: env::var("CACHE_MAX_MEMORY_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            cleanup_interval_seconds: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Memory budget expressed in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_mb * 1024 * 1024
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_memory_mb: 500,
            max_entries: 5000,
            cleanup_interval_seconds: 300,
        }
    }
}
