//! Cache Module
//!
//! Scoring, staleness and eviction policy for cached products.

mod eviction;
mod scoring;
mod stats;


// Re-export public types
pub use eviction::{
    is_stale, select_eviction_candidates, select_stale_for_deletion, select_stale_for_refresh,
    DEFAULT_EVICTION_BATCH, DEFAULT_MAX_CACHE_AGE_HOURS, DEFAULT_STALE_THRESHOLD_HOURS,
};
pub use scoring::{
    hours_since_access, recompute_score, FREQUENCY_SCALE, FREQUENCY_WEIGHT, PINNED_SCORE_FLOOR,
    RECENCY_HALF_LIFE_HOURS, RECENCY_WEIGHT,
};
pub use stats::CacheStats;
