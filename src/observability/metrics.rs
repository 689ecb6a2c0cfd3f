//! Sorted-set metrics
//!
//! Per OBSERVABILITY.md:
//! - Counters only, monotonic increase
//! - Reset only on process start
//! - Relaxed atomics, so read paths can count through `&self`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one sorted-set registry
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Sorted sets created by a first insert
    sets_created: AtomicU64,
    /// Inserts of new members
    members_added: AtomicU64,
    /// Inserts that replaced an existing member
    members_updated: AtomicU64,
    /// Members deleted by remove or rank-range removal
    members_removed: AtomicU64,
    /// Successful pops
    pops: AtomicU64,
    /// Score and rank range scans
    range_queries: AtomicU64,
    /// Rank lookups
    rank_queries: AtomicU64,
    /// Lookups that failed with not-found, member-not-exist or empty
    misses: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_sets_created(&self) {
        self.sets_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_members_added(&self) {
        self.members_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_members_updated(&self) {
        self.members_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_members_removed(&self, count: u64) {
        self.members_removed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_pops(&self) {
        self.pops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_range_queries(&self) {
        self.range_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rank_queries(&self) {
        self.rank_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sets_created: self.sets_created.load(Ordering::Relaxed),
            members_added: self.members_added.load(Ordering::Relaxed),
            members_updated: self.members_updated.load(Ordering::Relaxed),
            members_removed: self.members_removed.load(Ordering::Relaxed),
            pops: self.pops.load(Ordering::Relaxed),
            range_queries: self.range_queries.load(Ordering::Relaxed),
            rank_queries: self.rank_queries.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub sets_created: u64,
    pub members_added: u64,
    pub members_updated: u64,
    pub members_removed: u64,
    pub pops: u64,
    pub range_queries: u64,
    pub rank_queries: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_sets_created();
        registry.increment_members_added();
        registry.increment_members_added();
        registry.increment_members_updated();
        registry.add_members_removed(3);
        registry.increment_pops();
        registry.increment_range_queries();
        registry.increment_rank_queries();
        registry.increment_misses();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.sets_created, 1);
        assert_eq!(snapshot.members_added, 2);
        assert_eq!(snapshot.members_updated, 1);
        assert_eq!(snapshot.members_removed, 3);
        assert_eq!(snapshot.pops, 1);
        assert_eq!(snapshot.range_queries, 1);
        assert_eq!(snapshot.rank_queries, 1);
        assert_eq!(snapshot.misses, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.add_members_removed(12);
        registry.increment_range_queries();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["members_removed"], 12);
        assert_eq!(parsed["range_queries"], 1);
        assert_eq!(parsed["pops"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_range_queries();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().range_queries, 800);
    }
}
