use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// RewriteStats
///
/// Ephemeral, in-memory counters for membership-rewrite activity.
/// Increments use relaxed atomics: engines may run concurrently on
/// independent trees, and the counters are best-effort accounting, not
/// a synchronization mechanism.
///

#[derive(Debug, Default)]
pub struct RewriteStats {
    contains_sites_found: AtomicU64,
    rewrites_applied: AtomicU64,
    slow_evaluation_fallbacks: AtomicU64,
}

impl RewriteStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A membership-test call site (either form) was recognized,
    /// whether or not rewriting succeeds.
    pub(crate) fn record_contains_site(&self) {
        self.contains_sites_found.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rewrite(&self) {
        self.rewrites_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Receiver evaluation left the structural fast path.
    pub(crate) fn record_slow_fallback(&self) {
        self.slow_evaluation_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero all counters between measurement windows.
    pub fn reset(&self) {
        self.contains_sites_found.store(0, Ordering::Relaxed);
        self.rewrites_applied.store(0, Ordering::Relaxed);
        self.slow_evaluation_fallbacks.store(0, Ordering::Relaxed);
    }

    /// Point-in-time snapshot. Under concurrent rewrites each field is
    /// individually accurate but the set is not mutually consistent.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            contains_sites_found: self.contains_sites_found.load(Ordering::Relaxed),
            rewrites_applied: self.rewrites_applied.load(Ordering::Relaxed),
            slow_evaluation_fallbacks: self.slow_evaluation_fallbacks.load(Ordering::Relaxed),
        }
    }
}

///
/// StatsSnapshot
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub contains_sites_found: u64,
    pub rewrites_applied: u64,
    pub slow_evaluation_fallbacks: u64,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_reset() {
        let stats = RewriteStats::new();
        stats.record_contains_site();
        stats.record_contains_site();
        stats.record_rewrite();
        stats.record_slow_fallback();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                contains_sites_found: 2,
                rewrites_applied: 1,
                slow_evaluation_fallbacks: 1,
            }
        );

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn snapshot_round_trips_through_serde() {
        let stats = RewriteStats::new();
        stats.record_contains_site();
        stats.record_rewrite();

        let snapshot = stats.snapshot();
        let json = serde_json::to_string(&snapshot).expect("snapshot should serialize");
        let parsed: StatsSnapshot = serde_json::from_str(&json).expect("snapshot should parse");

        assert_eq!(parsed, snapshot);
    }
}
