//! Statistics tracking for object pools

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters for pool operations
///
/// Counters are updated with relaxed atomics; a [`snapshot`](Self::snapshot)
/// is a best-effort view, not a consistent cut.
#[derive(Debug, Default)]
pub struct PoolStats {
    acquires: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    creations: AtomicU64,
    factory_failures: AtomicU64,
    releases: AtomicU64,
    discards: AtomicU64,
    peak_available: AtomicUsize,
}

impl PoolStats {
    pub(crate) fn record_acquire(&self) {
        self.acquires.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_creation(&self) {
        self.creations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_factory_failure(&self) {
        self.factory_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a release that landed on the free stack, now `available` deep.
    pub(crate) fn record_release(&self, available: usize) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.peak_available.fetch_max(available, Ordering::Relaxed);
    }

    /// Record an instance dropped by the pool instead of kept.
    pub(crate) fn record_discard(&self, count: usize) {
        self.discards.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Copy the current counters into plain data
    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            acquires: self.acquires.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            creations: self.creations.load(Ordering::Relaxed),
            factory_failures: self.factory_failures.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            discards: self.discards.load(Ordering::Relaxed),
            peak_available: self.peak_available.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PoolStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStatsSnapshot {
    /// `acquire` and `try_acquire` calls
    pub acquires: u64,
    /// Acquires served from the free stack
    pub hits: u64,
    /// Acquires that found the free stack empty
    pub misses: u64,
    /// Instances built by the factory (misses, pre-warm, reserve)
    pub creations: u64,
    /// Factory calls that returned an error
    pub factory_failures: u64,
    /// Instances pushed onto the free stack
    pub releases: u64,
    /// Instances dropped (bound reached, clear, shrink)
    pub discards: u64,
    /// Deepest the free stack has been
    pub peak_available: usize,
}

impl PoolStatsSnapshot {
    /// Fraction of acquires served from the free stack (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.acquires == 0 {
            0.0
        } else {
            self.hits as f64 / self.acquires as f64
        }
    }
}
