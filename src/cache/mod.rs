//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction, and a soft
//! memory budget.

mod entry;
mod recency;
mod size;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use size::estimate_size;
pub use stats::{CacheStatsSnapshot, CleanupReport, OptimizeReport};
pub use store::BoundedCache;

pub(crate) use recency::RecencyList;
pub(crate) use stats::CacheCounters;

// == Public Constants ==
/// Fixed per-entry overhead added by the fallback size heuristic, in bytes
pub const FALLBACK_OVERHEAD_BYTES: usize = 200;

/// Hard cap on removals per eviction pass, bounding `set()` against
/// pathological inputs
pub const MAX_EVICTIONS_PER_SET: usize = 1000;
