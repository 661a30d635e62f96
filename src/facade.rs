//! Cache Facade Module
//!
//! Domain keying over the bounded cache: builds hierarchical keys for chat
//! history pages and LLM responses, and offers prefix-based bulk
//! invalidation and aggregated statistics. Holds no state of its own beyond
//! the key scheme - all storage lives in one shared [`BoundedCache`].
//!
//! Key scheme: `:`-separated segments where each parent scope is a literal
//! string-prefix of its children, so invalidating a scope is a single
//! prefix sweep. Invalidation prefixes always end with the separator, so
//! user 1 never matches user 12.

use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::cache::{BoundedCache, CacheStatsSnapshot, CleanupReport, OptimizeReport};
use crate::config::CacheConfig;

// == Default TTLs ==
/// Default TTL for cached history pages, in seconds
pub const DEFAULT_HISTORY_TTL_SECS: u64 = 300;

/// Default TTL for cached LLM responses, in seconds
pub const DEFAULT_LLM_TTL_SECS: u64 = 3600;

// == Cache Facade ==
/// Domain-keyed view over a shared [`BoundedCache`].
///
/// Constructed once at the application's composition root and handed to
/// every consumer; cloning shares the same underlying cache.
#[derive(Debug, Clone)]
pub struct CacheFacade {
    cache: Arc<BoundedCache>,
}

impl CacheFacade {
    // == Constructors ==
    /// Wraps an existing shared cache.
    pub fn new(cache: Arc<BoundedCache>) -> Self {
        Self { cache }
    }

    /// Builds a facade over a freshly constructed cache.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(Arc::new(BoundedCache::with_config(config)))
    }

    /// The underlying engine, for callers that key their own families.
    pub fn engine(&self) -> &BoundedCache {
        &self.cache
    }

    // == Chat History ==
    /// Retrieves a cached chat history page.
    pub fn get_chat_history(
        &self,
        user_id: i64,
        session_id: Option<i64>,
        skip: usize,
        limit: usize,
    ) -> Option<Value> {
        self.cache
            .get(&history_key(user_id, session_id, skip, limit))
    }

    /// Caches a chat history page with the given TTL (None = default).
    pub fn set_chat_history(
        &self,
        user_id: i64,
        session_id: Option<i64>,
        skip: usize,
        limit: usize,
        messages: Value,
        ttl_seconds: Option<u64>,
    ) {
        let key = history_key(user_id, session_id, skip, limit);
        self.cache
            .set(key, messages, ttl_seconds.unwrap_or(DEFAULT_HISTORY_TTL_SECS));
    }

    /// Invalidates cached history pages for a user - all of them, or only
    /// one session's. Returns the number of entries removed.
    pub fn invalidate_user_history(&self, user_id: i64, session_id: Option<i64>) -> usize {
        let prefix = match session_id {
            Some(sid) => format!("chat_history:{}:session:{}:", user_id, sid),
            None => format!("chat_history:{}:", user_id),
        };
        let removed = self.cache.invalidate_by_prefix(&prefix);
        debug!(user_id, ?session_id, removed, "invalidated history pages");
        removed
    }

    // == LLM Responses ==
    /// Retrieves a cached LLM response for a user's prompt/model pair.
    pub fn get_llm_response(&self, user_id: i64, content: &str, model: &str) -> Option<Value> {
        self.cache.get(&llm_key(user_id, content, model))
    }

    /// Caches an LLM response with the given TTL (None = default).
    pub fn set_llm_response(
        &self,
        user_id: i64,
        content: &str,
        model: &str,
        response: Value,
        ttl_seconds: Option<u64>,
    ) {
        let key = llm_key(user_id, content, model);
        self.cache
            .set(key, response, ttl_seconds.unwrap_or(DEFAULT_LLM_TTL_SECS));
    }

    /// Invalidates every cached LLM response for a user.
    pub fn invalidate_llm_responses(&self, user_id: i64) -> usize {
        self.cache
            .invalidate_by_prefix(&format!("llm_response:{}:", user_id))
    }

    // == All User Data ==
    /// Invalidates everything cached for a user: history pages and LLM
    /// responses. Returns the total number of entries removed.
    pub fn invalidate_all_for_user(&self, user_id: i64) -> usize {
        self.invalidate_user_history(user_id, None) + self.invalidate_llm_responses(user_id)
    }

    // == Passthroughs ==
    /// Aggregated statistics for the underlying cache.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Sweeps all currently-expired entries.
    pub fn force_cleanup(&self) -> CleanupReport {
        self.cache.force_cleanup()
    }

    /// Cleanup plus compaction of the underlying storage.
    pub fn optimize(&self) -> OptimizeReport {
        self.cache.optimize()
    }

    /// Drops all cached data.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

// == Key Builders ==
/// Key for one page of a user's chat history, optionally scoped to a
/// session. The session segment sits before the paging segments so a whole
/// session is one prefix.
fn history_key(user_id: i64, session_id: Option<i64>, skip: usize, limit: usize) -> String {
    match session_id {
        Some(sid) => format!(
            "chat_history:{}:session:{}:{}:{}",
            user_id, sid, skip, limit
        ),
        None => format!("chat_history:{}:{}:{}", user_id, skip, limit),
    }
}

/// Key for a user's LLM response. The prompt and model are folded into a
/// digest to keep keys short and uniform.
fn llm_key(user_id: i64, content: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(b":");
    hasher.update(model.as_bytes());
    let digest = hasher.finalize();
    format!("llm_response:{}:{:x}", user_id, digest)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_facade() -> CacheFacade {
        CacheFacade::with_config(&CacheConfig {
            max_memory_mb: 100,
            max_entries: 100,
            cleanup_interval_seconds: 300,
        })
    }

    #[test]
    fn test_history_key_format() {
        assert_eq!(history_key(7, None, 0, 50), "chat_history:7:0:50");
        assert_eq!(
            history_key(7, Some(3), 0, 50),
            "chat_history:7:session:3:0:50"
        );
    }

    #[test]
    fn test_history_key_session_scope_is_prefix_of_pages() {
        let key = history_key(7, Some(3), 20, 10);
        assert!(key.starts_with("chat_history:7:session:3:"));
        assert!(key.starts_with("chat_history:7:"));
    }

    #[test]
    fn test_llm_key_is_stable_and_distinct() {
        let a = llm_key(1, "hello", "gpt-4");
        let b = llm_key(1, "hello", "gpt-4");
        let c = llm_key(1, "hello", "gpt-3.5");
        let d = llm_key(2, "hello", "gpt-4");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.starts_with("llm_response:1:"));
    }

    #[test]
    fn test_chat_history_round_trip() {
        let facade = test_facade();
        let messages = json!([{"role": "user", "content": "hi"}]);

        facade.set_chat_history(1, None, 0, 50, messages.clone(), None);

        assert_eq!(facade.get_chat_history(1, None, 0, 50), Some(messages));
        assert_eq!(facade.get_chat_history(1, None, 50, 50), None);
        assert_eq!(facade.get_chat_history(2, None, 0, 50), None);
    }

    #[test]
    fn test_invalidate_session_keeps_other_sessions() {
        let facade = test_facade();

        facade.set_chat_history(1, Some(10), 0, 50, json!(["a"]), None);
        facade.set_chat_history(1, Some(10), 50, 50, json!(["b"]), None);
        facade.set_chat_history(1, Some(11), 0, 50, json!(["c"]), None);

        let removed = facade.invalidate_user_history(1, Some(10));

        assert_eq!(removed, 2);
        assert_eq!(facade.get_chat_history(1, Some(10), 0, 50), None);
        assert_eq!(
            facade.get_chat_history(1, Some(11), 0, 50),
            Some(json!(["c"]))
        );
    }

    #[test]
    fn test_invalidate_user_history_does_not_cross_users() {
        let facade = test_facade();

        // User 1 must not shadow user 12
        facade.set_chat_history(1, None, 0, 50, json!(["u1"]), None);
        facade.set_chat_history(12, None, 0, 50, json!(["u12"]), None);

        let removed = facade.invalidate_user_history(1, None);

        assert_eq!(removed, 1);
        assert_eq!(facade.get_chat_history(12, None, 0, 50), Some(json!(["u12"])));
    }

    #[test]
    fn test_llm_response_round_trip() {
        let facade = test_facade();

        facade.set_llm_response(1, "what is rust", "gpt-4", json!("a language"), None);

        assert_eq!(
            facade.get_llm_response(1, "what is rust", "gpt-4"),
            Some(json!("a language"))
        );
        assert_eq!(facade.get_llm_response(1, "what is rust", "claude"), None);
    }

    #[test]
    fn test_invalidate_all_for_user() {
        let facade = test_facade();

        facade.set_chat_history(1, None, 0, 50, json!(["h"]), None);
        facade.set_chat_history(1, Some(2), 0, 50, json!(["s"]), None);
        facade.set_llm_response(1, "q", "m", json!("r"), None);
        facade.set_llm_response(2, "q", "m", json!("other"), None);

        let removed = facade.invalidate_all_for_user(1);

        assert_eq!(removed, 3);
        assert_eq!(facade.get_chat_history(1, None, 0, 50), None);
        assert_eq!(facade.get_llm_response(1, "q", "m"), None);
        assert_eq!(facade.get_llm_response(2, "q", "m"), Some(json!("other")));
    }

    #[test]
    fn test_facade_shares_one_engine() {
        let facade = test_facade();
        let clone = facade.clone();

        facade.set_llm_response(1, "q", "m", json!("r"), None);

        assert_eq!(clone.get_llm_response(1, "q", "m"), Some(json!("r")));
        assert_eq!(clone.stats().entry_count, 1);
    }

    #[test]
    fn test_facade_stats_and_clear() {
        let facade = test_facade();

        facade.set_chat_history(1, None, 0, 50, json!(["h"]), None);
        facade.get_chat_history(1, None, 0, 50);
        facade.get_chat_history(9, None, 0, 50);

        let stats = facade.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);

        facade.clear();
        assert_eq!(facade.stats().entry_count, 0);
    }
}
