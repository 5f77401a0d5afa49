//! Product Model
//!
//! The cached product entity together with its pin state (wishlist and
//! price tracking).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ProductRecord;

// == Public Constants ==
/// Cache score assigned to a product that has never been rescored.
pub const DEFAULT_CACHE_SCORE: f32 = 0.5;

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";

// == Price Tracking ==
/// Tracking state of a product. Present only while the product is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTracking {
    /// When tracking was (last) started
    pub started_at: DateTime<Utc>,
    /// Price at or below which the user wants to be alerted
    pub price_target: Option<f64>,
}

// == Product ==
/// A cached product listing.
///
/// Tracking and wishlist membership are modelled as optional timestamps, so
/// `is_tracked()` and `is_in_wishlist()` can never disagree with their
/// "since" fields. Persisted records go through [`ProductRecord`], which
/// normalizes inconsistent flags on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub image_url: String,
    pub product_url: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub seller_id: Option<String>,
    pub seller_name: Option<String>,
    pub rating: Option<f32>,
    pub review_count: u32,
    pub shipping_cost: Option<f64>,
    pub estimated_delivery_days: Option<u32>,

    /// Last time the product data was written to the cache
    pub cached_at: DateTime<Utc>,
    /// Last time the user looked at the product
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u32,
    /// Retention value in [0, 1]
    pub cache_score: f32,

    pub tracking: Option<PriceTracking>,
    pub wishlisted_at: Option<DateTime<Utc>>,
}

impl Product {
    // == Constructor ==
    /// Creates a freshly cached, unpinned product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            currency: DEFAULT_CURRENCY.to_string(),
            image_url: String::new(),
            product_url: String::new(),
            description: None,
            category: None,
            seller_id: None,
            seller_name: None,
            rating: None,
            review_count: 0,
            shipping_cost: None,
            estimated_delivery_days: None,
            cached_at: now,
            last_accessed_at: now,
            access_count: 0,
            cache_score: DEFAULT_CACHE_SCORE,
            tracking: None,
            wishlisted_at: None,
        }
    }

    // == Builders ==
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // == Pin State ==
    /// Whether the product's price is being tracked.
    pub fn is_tracked(&self) -> bool {
        self.tracking.is_some()
    }

    /// Whether the product is on the wishlist.
    pub fn is_in_wishlist(&self) -> bool {
        self.wishlisted_at.is_some()
    }

    /// Pinned products are exempt from value-based eviction and age pruning.
    pub fn is_pinned(&self) -> bool {
        self.is_tracked() || self.is_in_wishlist()
    }

    /// Target price, if tracked with one.
    pub fn price_target(&self) -> Option<f64> {
        self.tracking.and_then(|t| t.price_target)
    }

    /// When tracking started, if tracked.
    pub fn tracking_started_at(&self) -> Option<DateTime<Utc>> {
        self.tracking.map(|t| t.started_at)
    }

    // == Display ==
    /// Formats the price with its currency symbol.
    pub fn display_price(&self) -> String {
        match self.currency.as_str() {
            "USD" => format!("${:.2}", self.price),
            "EUR" => format!("€{:.2}", self.price),
            "GBP" => format!("£{:.2}", self.price),
            other => format!("{} {:.2}", other, self.price),
        }
    }

    // == Cache Age ==
    /// Whole hours elapsed since the product was cached.
    pub fn cache_age_hours(&self, now: DateTime<Utc>) -> i64 {
        (now - self.cached_at).num_hours()
    }

    // == Copy-on-write Updates ==
    /// Returns a copy with one more access recorded at `now`.
    pub fn with_access_recorded(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_accessed_at: now,
            access_count: self.access_count.saturating_add(1),
            ..self.clone()
        }
    }

    /// Returns a copy with the given score, clamped to [0, 1].
    pub fn with_cache_score(&self, score: f32) -> Self {
        Self {
            cache_score: normalize_score(score),
            ..self.clone()
        }
    }

    /// Returns a copy added to the wishlist at `now`.
    pub fn with_wishlist(&self, now: DateTime<Utc>) -> Self {
        Self {
            wishlisted_at: Some(now),
            ..self.clone()
        }
    }

    /// Returns a copy removed from the wishlist.
    pub fn without_wishlist(&self) -> Self {
        Self {
            wishlisted_at: None,
            ..self.clone()
        }
    }
}

/// Clamps a score into [0, 1]; NaN falls back to the default score.
pub fn normalize_score(score: f32) -> f32 {
    if score.is_nan() {
        DEFAULT_CACHE_SCORE
    } else {
        score.clamp(0.0, 1.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_product_defaults() {
        let product = Product::new("p1", "Phone case", 9.99, now());

        assert_eq!(product.currency, "USD");
        assert_eq!(product.access_count, 0);
        assert_eq!(product.cache_score, DEFAULT_CACHE_SCORE);
        assert_eq!(product.cached_at, product.last_accessed_at);
        assert!(!product.is_pinned());
    }

    #[test]
    fn test_display_price() {
        let product = Product::new("p1", "Lamp", 20.0, now());
        assert_eq!(product.display_price(), "$20.00");
        assert_eq!(product.clone().with_currency("EUR").display_price(), "€20.00");
        assert_eq!(product.clone().with_currency("GBP").display_price(), "£20.00");
        assert_eq!(product.with_currency("JPY").display_price(), "JPY 20.00");
    }

    #[test]
    fn test_cache_age_hours_truncates() {
        let product = Product::new("p1", "Lamp", 20.0, now());
        let later = now() + Duration::minutes(150);
        assert_eq!(product.cache_age_hours(later), 2);
    }

    #[test]
    fn test_access_recorded() {
        let product = Product::new("p1", "Lamp", 20.0, now());
        let later = now() + Duration::hours(1);

        let accessed = product.with_access_recorded(later).with_access_recorded(later);

        assert_eq!(accessed.access_count, 2);
        assert_eq!(accessed.last_accessed_at, later);
        assert_eq!(accessed.cached_at, now());
    }

    #[test]
    fn test_cache_score_is_clamped() {
        let product = Product::new("p1", "Lamp", 20.0, now());
        assert_eq!(product.with_cache_score(1.7).cache_score, 1.0);
        assert_eq!(product.with_cache_score(-0.2).cache_score, 0.0);
        assert_eq!(product.with_cache_score(f32::NAN).cache_score, DEFAULT_CACHE_SCORE);
        assert_eq!(product.with_cache_score(0.3).cache_score, 0.3);
    }

    #[test]
    fn test_wishlist_pins_product() {
        let product = Product::new("p1", "Lamp", 20.0, now()).with_wishlist(now());
        assert!(product.is_in_wishlist());
        assert!(product.is_pinned());

        let removed = product.without_wishlist();
        assert!(!removed.is_in_wishlist());
        assert!(removed.wishlisted_at.is_none());
    }
}
