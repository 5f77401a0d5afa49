//! Cache Statistics Module
//!
//! Tracks product cache lookups and removals.

use serde::Serialize;

// == Cache Stats ==
/// Tracks product cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found a cached product
    pub hits: u64,
    /// Lookups for a product that is not cached
    pub misses: u64,
    /// Products removed by low-value eviction
    pub evictions: u64,
    /// Products removed for exceeding the maximum cache age
    pub stale_removed: u64,
    /// Current number of cached products
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Evictions ==
    /// Adds `count` to the eviction counter.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Record Stale Removals ==
    /// Adds `count` to the stale removal counter.
    pub fn record_stale_removed(&mut self, count: usize) {
        self.stale_removed += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
