//! Size Estimation Module
//!
//! Best-effort byte-size estimation for stored values. The memory budget is a
//! soft target, so an approximate figure is acceptable by design of the
//! accounting scheme; what matters is that estimation never fails.

use serde_json::Value;
use tracing::debug;

use crate::cache::FALLBACK_OVERHEAD_BYTES;

// == Estimate Size ==
/// Estimates the in-memory footprint of a value in bytes.
///
/// Tries an exact serialization-based measurement first; on any failure falls
/// back to the rendered-string length plus a fixed per-entry overhead. Never
/// panics and has no side effects beyond a low-severity log line.
pub fn estimate_size(value: &Value) -> usize {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len(),
        Err(err) => {
            debug!("size estimation fell back to heuristic: {}", err);
            value.to_string().len() + FALLBACK_OVERHEAD_BYTES
        }
    }
}
