//! Cache Scoring Policy
//!
//! Derives a product's retention value from how often and how recently it
//! was accessed.

use chrono::{DateTime, Utc};

use crate::models::{Product, DEFAULT_CACHE_SCORE};

// == Scoring Constants ==
/// Share of the score driven by access frequency
pub const FREQUENCY_WEIGHT: f64 = 0.6;

/// Share of the score driven by access recency
pub const RECENCY_WEIGHT: f64 = 0.4;

/// Recent access count at which the frequency term reaches 1 - 1/e
pub const FREQUENCY_SCALE: f64 = 5.0;

/// Hours after which the recency term halves
pub const RECENCY_HALF_LIFE_HOURS: f64 = 24.0;

/// Lowest score a wishlisted or tracked product can be given
pub const PINNED_SCORE_FLOOR: f32 = 0.75;

// == Recompute Score ==
/// Computes a score in [0, 1] for `entry`.
///
/// The score is non-decreasing in `recent_access_count` and non-increasing in
/// `recency_hours`. A product that was never accessed keeps the default
/// score. Negative recency is treated as "just now" and NaN as "never".
///
/// # Arguments
/// * `entry` - The product being scored
/// * `recent_access_count` - Accesses within the scoring window
/// * `recency_hours` - Hours since the last access
pub fn recompute_score(entry: &Product, recent_access_count: u32, recency_hours: f64) -> f32 {
    if entry.access_count == 0 {
        return DEFAULT_CACHE_SCORE;
    }

    let frequency = 1.0 - (-f64::from(recent_access_count) / FREQUENCY_SCALE).exp();

    let hours = if recency_hours.is_nan() {
        f64::INFINITY
    } else {
        recency_hours.max(0.0)
    };
    let recency = 0.5_f64.powf(hours / RECENCY_HALF_LIFE_HOURS);

    let score = (FREQUENCY_WEIGHT * frequency + RECENCY_WEIGHT * recency).clamp(0.0, 1.0) as f32;

    if entry.is_pinned() {
        score.max(PINNED_SCORE_FLOOR)
    } else {
        score
    }
}

/// Fractional hours since `entry` was last accessed.
pub fn hours_since_access(entry: &Product, now: DateTime<Utc>) -> f64 {
    (now - entry.last_accessed_at).num_milliseconds() as f64 / 3_600_000.0
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn accessed_product() -> Product {
        let mut product = Product::new("p1", "Headphones", 49.0, Utc::now());
        product.access_count = 3;
        product
    }

    #[test]
    fn test_never_accessed_keeps_default() {
        let product = Product::new("p1", "Headphones", 49.0, Utc::now());
        assert_eq!(recompute_score(&product, 50, 0.0), DEFAULT_CACHE_SCORE);
    }

    #[test]
    fn test_score_in_unit_range() {
        let product = accessed_product();
        for (count, hours) in [(0, 0.0), (u32::MAX, 0.0), (0, 1e9), (7, 12.0)] {
            let score = recompute_score(&product, count, hours);
            assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn test_more_accesses_raise_score() {
        let product = accessed_product();
        assert!(recompute_score(&product, 10, 5.0) > recompute_score(&product, 1, 5.0));
    }

    #[test]
    fn test_older_access_lowers_score() {
        let product = accessed_product();
        assert!(recompute_score(&product, 3, 1.0) > recompute_score(&product, 3, 100.0));
    }

    #[test]
    fn test_negative_and_nan_recency() {
        let product = accessed_product();
        assert_eq!(
            recompute_score(&product, 2, -5.0),
            recompute_score(&product, 2, 0.0)
        );
        assert_eq!(
            recompute_score(&product, 2, f64::NAN),
            recompute_score(&product, 2, f64::INFINITY)
        );
    }

    #[test]
    fn test_pinned_floor() {
        let product = accessed_product().with_wishlist(Utc::now());
        assert_eq!(recompute_score(&product, 0, 10_000.0), PINNED_SCORE_FLOOR);
    }

    #[test]
    fn test_hours_since_access() {
        let product = accessed_product();
        let later = product.last_accessed_at + chrono::Duration::minutes(90);
        assert_eq!(hours_since_access(&product, later), 1.5);
    }
}
