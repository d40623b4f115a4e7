use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Generic in-process cache with per-entry expiry.
///
/// Serves the stale-tolerant display path only; admission decisions always
/// read the ledger fresh under the show lock. Expired entries are dropped
/// on the next write.
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> TtlCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, e| now < e.expires_at);
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

impl<T: Clone> TtlCache<T> {
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
