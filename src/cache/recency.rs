//! Recency List Module
//!
//! Tracks key access order for LRU eviction.

use std::collections::VecDeque;

// == Recency List ==
/// Access-order tracking for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Least recently used
/// - Back = Most recently used
///
/// The deque records access sequence rather than timestamps, so recency ties
/// are impossible by construction.
#[derive(Debug, Default)]
pub(crate) struct RecencyList {
    /// Keys ordered from least to most recently used
    order: VecDeque<String>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Promote ==
    /// Marks a key as most recently used (moves to back).
    ///
    /// If the key is already tracked it is repositioned; otherwise it is
    /// appended.
    pub fn promote(&mut self, key: &str) {
        self.forget(key);
        self.order.push_back(key.to_string());
    }

    // == Forget ==
    /// Drops a key from the order. No-op for untracked keys.
    pub fn forget(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used key, or None when empty.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek LRU ==
    /// Returns the least recently used key without removing it.
    #[allow(dead_code)]
    pub fn peek_lru(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Clear ==
    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Shrink ==
    /// Releases spare backing capacity.
    pub fn shrink_to_fit(&mut self) {
        self.order.shrink_to_fit();
    }

    // == Contains ==
    /// Checks whether a key is tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
