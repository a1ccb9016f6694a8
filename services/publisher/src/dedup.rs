//! Dedup window for `publish(opportunity)` (spec §4.9: "dedup by id
//! within 30s window; drop duplicates"). A single mutex-guarded map is
//! enough per spec §5 ("contention negligible — one op per published
//! opportunity").

use parking_lot::Mutex;
use std::collections::HashMap;

pub const DEFAULT_WINDOW_MS: u64 = 30_000;

pub struct DedupWindow {
    window_ms: u64,
    seen: Mutex<HashMap<String, u64>>,
}

impl DedupWindow {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, seen: Mutex::new(HashMap::new()) }
    }

    /// Returns `true` if `id` has not been seen within the window (and
    /// records it as seen now); `false` if this is a duplicate to drop.
    /// Sweeps expired entries out of the map on every call so the table
    /// doesn't grow unbounded across a long-running process.
    pub fn admit(&self, id: &str, now_ms: u64) -> bool {
        let mut seen = self.seen.lock();
        seen.retain(|_, ts| now_ms.saturating_sub(*ts) < self.window_ms);
        if let Some(&last) = seen.get(id) {
            if now_ms.saturating_sub(last) < self.window_ms {
                return false;
            }
        }
        seen.insert(id.to_string(), now_ms);
        true
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}
