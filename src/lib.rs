//! Chat Cache - a memory-bounded in-process cache for chat backends
//!
//! Avoids redundant database reads (chat history pages) and redundant LLM
//! invocations (prompt/response pairs) by keeping results in memory behind a
//! soft memory budget, an entry-count ceiling, TTL expiration and LRU
//! eviction.
//!
//! The crate exposes two layers:
//! - [`BoundedCache`] - the eviction engine: raw string keys, opaque JSON
//!   values, TTL + LRU + memory accounting under a single coarse lock.
//! - [`CacheFacade`] - domain keying: builds hierarchical keys for chat
//!   history pages and LLM responses and offers prefix-based bulk
//!   invalidation, delegating all storage to one shared [`BoundedCache`].
//!
//! Every public operation is total: a cache failure degrades to a miss or a
//! no-op plus a diagnostic log, never an error. Callers must always be able
//! to recompute the value from the source of truth.

pub mod cache;
pub mod config;
pub mod facade;

pub use cache::{BoundedCache, CacheStatsSnapshot, CleanupReport, OptimizeReport};
pub use config::CacheConfig;
pub use facade::CacheFacade;
