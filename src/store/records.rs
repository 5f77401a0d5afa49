//! Store Records
//!
//! Persisted shapes of the entities and their [`Record`] bindings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EntityKind, Record, SequencedRecord};
use crate::models::{
    normalize_score, InteractionEvent, Order, PriceObservation, PriceTracking, Product,
    UserPreferences, DEFAULT_CURRENCY,
};

// == Product Record ==
/// Flat, column-style encoding of a [`Product`].
///
/// Pin state is stored as flag + timestamp pairs. Decoding a record whose
/// flags disagree with their timestamps normalizes it: the flag wins, a
/// missing tracking start falls back to `cached_at`, and a missing wishlist
/// time falls back to `last_accessed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub product_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub estimated_delivery_days: Option<u32>,
    pub cached_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    #[serde(default)]
    pub access_count: u32,
    #[serde(default = "default_score")]
    pub cache_score: f32,
    #[serde(default)]
    pub is_tracked: bool,
    #[serde(default)]
    pub tracking_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price_target: Option<f64>,
    #[serde(default)]
    pub is_in_wishlist: bool,
    #[serde(default)]
    pub added_to_wishlist_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_score() -> f32 {
    crate::models::DEFAULT_CACHE_SCORE
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        if record.is_tracked != record.tracking_started_at.is_some()
            || (!record.is_tracked && record.price_target.is_some())
        {
            warn!(
                "Normalizing inconsistent tracking state for product {}",
                record.id
            );
        }
        if record.is_in_wishlist != record.added_to_wishlist_at.is_some() {
            warn!(
                "Normalizing inconsistent wishlist state for product {}",
                record.id
            );
        }

        let tracking = record.is_tracked.then(|| PriceTracking {
            started_at: record.tracking_started_at.unwrap_or(record.cached_at),
            price_target: record.price_target,
        });
        let wishlisted_at = record
            .is_in_wishlist
            .then(|| record.added_to_wishlist_at.unwrap_or(record.last_accessed_at));

        Product {
            id: record.id,
            name: record.name,
            price: record.price,
            currency: record.currency,
            image_url: record.image_url,
            product_url: record.product_url,
            description: record.description,
            category: record.category,
            seller_id: record.seller_id,
            seller_name: record.seller_name,
            rating: record.rating,
            review_count: record.review_count,
            shipping_cost: record.shipping_cost,
            estimated_delivery_days: record.estimated_delivery_days,
            cached_at: record.cached_at,
            last_accessed_at: record.last_accessed_at,
            access_count: record.access_count,
            cache_score: normalize_score(record.cache_score),
            tracking,
            wishlisted_at,
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord {
            is_tracked: product.is_tracked(),
            tracking_started_at: product.tracking_started_at(),
            price_target: product.price_target(),
            is_in_wishlist: product.is_in_wishlist(),
            added_to_wishlist_at: product.wishlisted_at,
            id: product.id,
            name: product.name,
            price: product.price,
            currency: product.currency,
            image_url: product.image_url,
            product_url: product.product_url,
            description: product.description,
            category: product.category,
            seller_id: product.seller_id,
            seller_name: product.seller_name,
            rating: product.rating,
            review_count: product.review_count,
            shipping_cost: product.shipping_cost,
            estimated_delivery_days: product.estimated_delivery_days,
            cached_at: product.cached_at,
            last_accessed_at: product.last_accessed_at,
            access_count: product.access_count,
            cache_score: product.cache_score,
        }
    }
}

// == Record Bindings ==
impl Record for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl Record for PriceObservation {
    const KIND: EntityKind = EntityKind::PriceHistory;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl SequencedRecord for PriceObservation {
    fn with_sequence_id(self, id: u64) -> Self {
        Self { id, ..self }
    }
}

impl Record for InteractionEvent {
    const KIND: EntityKind = EntityKind::Interaction;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl SequencedRecord for InteractionEvent {
    fn with_sequence_id(self, id: u64) -> Self {
        Self { id, ..self }
    }
}

impl Record for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn record_id(&self) -> String {
        self.order_id.clone()
    }
}

impl Record for UserPreferences {
    const KIND: EntityKind = EntityKind::Preferences;

    fn record_id(&self) -> String {
        self.user_id.clone()
    }
}
