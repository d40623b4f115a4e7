use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

/// Process-wide registry of per-show admission locks.
///
/// Each show gets exactly one lock for the lifetime of the process; repeated
/// calls hand back the same instance. The registry's own mutex covers only
/// the map lookup-or-insert, never the booking logic, so admissions for
/// unrelated shows contend here only for the duration of a map operation.
/// Entries are never removed: shows are long-lived relative to the process.
pub struct ShowLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
    acquisitions: AtomicU64,
}

impl ShowLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            acquisitions: AtomicU64::new(0),
        }
    }

    /// Returns the admission lock for `show_id`, creating it on first use.
    pub fn lock_for(&self, show_id: i64) -> Arc<AsyncMutex<()>> {
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        let mut locks = self.locks.lock();
        locks
            .entry(show_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// How many times a lock was handed out. Test instrumentation.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Relaxed)
    }

    /// Number of shows with a registered lock.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ShowLocks {
    fn default() -> Self {
        Self::new()
    }
}
