use dockside_dns_application::ports::CacheStats;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// align(64) keeps `hits` and `misses` on their own cache line, away from the
// counters that only move on insert.
#[derive(Default)]
#[repr(align(64))]
pub struct CacheMetrics {
    // Hot counters, touched on every lookup.
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    _hot_pad: [u64; 6],

    // Cold counters.
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheMetrics {
    pub fn reset(&self) {
        self.hits.store(0, AtomicOrdering::Relaxed);
        self.misses.store(0, AtomicOrdering::Relaxed);
        self.insertions.store(0, AtomicOrdering::Relaxed);
        self.evictions.store(0, AtomicOrdering::Relaxed);
    }

    pub fn snapshot(&self, entries: usize) -> CacheStats {
        CacheStats {
            entries,
            hits: self.hits.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
            insertions: self.insertions.load(AtomicOrdering::Relaxed),
            evictions: self.evictions.load(AtomicOrdering::Relaxed),
        }
    }
}
