//! Staleness & Eviction Engine
//!
//! Pure selection functions. They never delete anything themselves and never
//! select a pinned (wishlisted or tracked) product for deletion.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::models::Product;

// == Public Constants ==
/// Age after which a cached product should be refreshed
pub const DEFAULT_STALE_THRESHOLD_HOURS: i64 = 24;

/// Age after which an unpinned cached product is deleted (7 days)
pub const DEFAULT_MAX_CACHE_AGE_HOURS: i64 = 168;

/// Products evicted per low-value eviction round
pub const DEFAULT_EVICTION_BATCH: usize = 10;

// == Is Stale ==
/// True when more than `threshold_hours` whole hours passed since caching.
pub fn is_stale(entry: &Product, now: DateTime<Utc>, threshold_hours: i64) -> bool {
    entry.cache_age_hours(now) > threshold_hours
}

// == Eviction Candidates ==
/// Returns up to `limit` ids of unpinned products, lowest value first.
///
/// Ordered by cache score, then last access time, both ascending; remaining
/// ties are broken by id so the selection is deterministic.
pub fn select_eviction_candidates(entries: &[Product], limit: usize) -> Vec<String> {
    let mut candidates: Vec<&Product> = entries.iter().filter(|p| !p.is_pinned()).collect();

    candidates.sort_by(|a, b| {
        a.cache_score
            .total_cmp(&b.cache_score)
            .then_with(|| a.last_accessed_at.cmp(&b.last_accessed_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    candidates
        .into_iter()
        .take(limit)
        .map(|p| p.id.clone())
        .collect()
}

// == Stale For Deletion ==
/// Ids of unpinned products cached more than `max_age_hours` ago.
pub fn select_stale_for_deletion(
    entries: &[Product],
    now: DateTime<Utc>,
    max_age_hours: i64,
) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|p| !p.is_pinned() && is_stale(p, now, max_age_hours))
        .map(|p| p.id.clone())
        .collect()
}

// == Stale For Refresh ==
/// Stale products that should be refetched, most recently accessed first.
///
/// Pinned products are included: refreshing is not deleting.
pub fn select_stale_for_refresh<'a>(
    entries: &'a [Product],
    now: DateTime<Utc>,
    threshold_hours: i64,
) -> Vec<&'a Product> {
    let mut stale: Vec<&Product> = entries
        .iter()
        .filter(|p| is_stale(p, now, threshold_hours))
        .collect();
    stale.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));
    stale
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTracking;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 18, 0, 0).unwrap()
    }

    fn product(id: &str, score: f32, accessed_hours_ago: i64) -> Product {
        let mut product = Product::new(id, id, 10.0, now()).with_cache_score(score);
        product.last_accessed_at = now() - Duration::hours(accessed_hours_ago);
        product
    }

    fn cached_hours_ago(id: &str, hours: i64) -> Product {
        let mut product = Product::new(id, id, 10.0, now());
        product.cached_at = now() - Duration::hours(hours);
        product
    }

    fn tracked(mut product: Product) -> Product {
        product.tracking = Some(PriceTracking {
            started_at: now(),
            price_target: None,
        });
        product
    }

    #[test]
    fn test_is_stale_boundary() {
        assert!(!is_stale(&cached_hours_ago("a", 24), now(), 24));
        assert!(is_stale(&cached_hours_ago("a", 25), now(), 24));
    }

    #[test]
    fn test_is_stale_uses_whole_hours() {
        let mut product = cached_hours_ago("a", 24);
        product.cached_at -= Duration::minutes(59);
        assert!(!is_stale(&product, now(), 24));
    }

    #[test]
    fn test_eviction_order() {
        let entries = vec![
            product("high", 0.9, 1),
            product("low_recent", 0.1, 1),
            product("low_old", 0.1, 50),
            product("mid", 0.5, 100),
        ];

        let candidates = select_eviction_candidates(&entries, 10);
        assert_eq!(candidates, vec!["low_old", "low_recent", "mid", "high"]);
    }

    #[test]
    fn test_eviction_tie_broken_by_id() {
        let entries = vec![product("b", 0.2, 3), product("a", 0.2, 3), product("c", 0.2, 3)];
        assert_eq!(select_eviction_candidates(&entries, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_eviction_skips_pinned() {
        let entries = vec![
            product("wish", 0.0, 100).with_wishlist(now()),
            tracked(product("tracked", 0.0, 100)),
            product("plain", 0.8, 0),
        ];
        assert_eq!(select_eviction_candidates(&entries, 5), vec!["plain"]);
    }

    #[test]
    fn test_eviction_zero_limit() {
        let entries = vec![product("a", 0.1, 1)];
        assert!(select_eviction_candidates(&entries, 0).is_empty());
    }

    #[test]
    fn test_stale_for_deletion() {
        let entries = vec![
            cached_hours_ago("fresh", 10),
            cached_hours_ago("old", 200),
            cached_hours_ago("old_wish", 200).with_wishlist(now()),
            tracked(cached_hours_ago("old_tracked", 500)),
        ];

        let doomed = select_stale_for_deletion(&entries, now(), DEFAULT_MAX_CACHE_AGE_HOURS);
        assert_eq!(doomed.into_iter().collect::<Vec<_>>(), vec!["old"]);
    }

    #[test]
    fn test_stale_for_refresh_includes_pinned() {
        let mut older_access = cached_hours_ago("a", 30).with_wishlist(now());
        older_access.last_accessed_at = now() - Duration::hours(5);
        let mut newer_access = cached_hours_ago("b", 30);
        newer_access.last_accessed_at = now() - Duration::hours(1);
        let entries = vec![older_access, newer_access, cached_hours_ago("c", 2)];

        let ids: Vec<&str> = select_stale_for_refresh(&entries, now(), DEFAULT_STALE_THRESHOLD_HOURS)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
