//! Most recent memory ranking, kept between polls.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::metrics::ProcessMemoryEntry;

/// How old a cached ranking may be before on-demand requests re-run `top`
pub const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq)]
pub struct MemorySnapshot {
    pub processes: Vec<ProcessMemoryEntry>,
    pub taken_at: DateTime<Utc>,
}

/// Single-slot cache; each store replaces the previous snapshot
#[derive(Debug, Default)]
pub struct SnapshotCache {
    slot: Mutex<Option<MemorySnapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, processes: Vec<ProcessMemoryEntry>, taken_at: DateTime<Utc>) {
        *self.slot.lock() = Some(MemorySnapshot { processes, taken_at });
    }

    pub fn latest(&self) -> Option<MemorySnapshot> {
        self.slot.lock().clone()
    }

    /// The cached snapshot if it is no older than `max_age` at `now`
    pub fn latest_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> Option<MemorySnapshot> {
        let max_age = chrono::Duration::from_std(max_age).ok()?;
        self.slot
            .lock()
            .as_ref()
            .filter(|snapshot| now - snapshot.taken_at <= max_age)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(mem: f64) -> ProcessMemoryEntry {
        ProcessMemoryEntry {
            pid: 1,
            user: "root".to_string(),
            command: "init".to_string(),
            memory_percent: mem,
            cpu_percent: 0.0,
        }
    }

    #[test]
    fn test_empty_cache() {
        let cache = SnapshotCache::new();
        assert!(cache.latest().is_none());
        assert!(cache.latest_fresh(SNAPSHOT_MAX_AGE, Utc::now()).is_none());
    }

    #[test]
    fn test_store_replaces_and_staleness() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cache = SnapshotCache::new();
        cache.store(vec![entry(1.0)], t0);
        cache.store(vec![entry(2.0)], t0);
        assert_eq!(cache.latest().unwrap().processes[0].memory_percent, 2.0);

        let fresh = t0 + chrono::Duration::seconds(15);
        assert!(cache.latest_fresh(SNAPSHOT_MAX_AGE, fresh).is_some());

        let stale = t0 + chrono::Duration::seconds(16);
        assert!(cache.latest_fresh(SNAPSHOT_MAX_AGE, stale).is_none());
        assert!(cache.latest().is_some());
    }
}
