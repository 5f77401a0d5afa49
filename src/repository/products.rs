//! Product Repository
//!
//! Applies the cache and pricing policies to products and price history held
//! in injected stores.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cache::{
    hours_since_access, is_stale, recompute_score, select_eviction_candidates,
    select_stale_for_deletion, select_stale_for_refresh, CacheStats,
};
use crate::error::{CompanionError, Result};
use crate::models::{normalize_score, PriceChange, PriceObservation, Product};
use crate::pricing::{self, record_price_observation, PriceAlertPolicy};
use crate::store::{AppendStore, EntryStore};
use crate::window;

// == Price Update ==
/// Outcome of observing a new price for a cached product.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    /// Observation appended to the history, if the price was new
    pub observation: Option<PriceObservation>,
    /// Change against the previous observation, if there was one
    pub change: Option<PriceChange>,
    /// Change from the cached price, present when the alert policy fired
    pub alert: Option<PriceChange>,
}

// == Product Repository ==
#[derive(Debug)]
pub struct ProductRepository<P, H> {
    products: P,
    history: H,
    stats: CacheStats,
}

impl<P, H> ProductRepository<P, H>
where
    P: EntryStore<Product>,
    H: AppendStore<PriceObservation>,
{
    /// Creates a repository over the given product and price history stores.
    pub fn new(products: P, history: H) -> Self {
        Self {
            products,
            history,
            stats: CacheStats::new(),
        }
    }

    // == Lookups ==
    /// Looks up a cached product, counting the lookup as a hit or miss.
    ///
    /// # Errors
    /// `NotFound` when the product is not cached.
    pub fn get(&mut self, product_id: &str) -> Result<Product> {
        match self.products.get_by_id(product_id)? {
            Some(product) => {
                self.stats.record_hit();
                Ok(product)
            }
            None => {
                self.stats.record_miss();
                Err(CompanionError::NotFound(product_id.to_string()))
            }
        }
    }

    /// Looks up a cached product without touching the statistics.
    pub fn find(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self.products.get_by_id(product_id)?)
    }

    /// Every cached product, most recently accessed first.
    pub fn all(&self) -> Result<Vec<Product>> {
        let mut products = self.products.get_all()?;
        sort_by_last_access_desc(&mut products);
        Ok(products)
    }

    /// Products whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.to_lowercase();
        let mut products = self.products.query(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })?;
        sort_by_last_access_desc(&mut products);
        Ok(products)
    }

    /// Products in `category`, most recently accessed first.
    pub fn by_category(&self, category: &str) -> Result<Vec<Product>> {
        let mut products = self
            .products
            .query(|p| p.category.as_deref() == Some(category))?;
        sort_by_last_access_desc(&mut products);
        Ok(products)
    }

    /// Up to `limit` products, most recently accessed first.
    pub fn recently_viewed(&self, limit: usize) -> Result<Vec<Product>> {
        let mut products = self.all()?;
        products.truncate(limit);
        Ok(products)
    }

    /// Wishlisted products, most recently added first.
    pub fn wishlist(&self) -> Result<Vec<Product>> {
        let mut products = self.products.query(Product::is_in_wishlist)?;
        products.sort_by(|a, b| b.wishlisted_at.cmp(&a.wishlisted_at));
        Ok(products)
    }

    /// Tracked products, most recently started first.
    pub fn tracked(&self) -> Result<Vec<Product>> {
        let mut products = self.products.query(Product::is_tracked)?;
        products.sort_by(|a, b| b.tracking_started_at().cmp(&a.tracking_started_at()));
        Ok(products)
    }

    /// Tracked products whose cached price is at or below their target.
    pub fn target_hit(&self) -> Result<Vec<Product>> {
        Ok(self
            .products
            .query(|p| matches!(p.price_target(), Some(target) if p.price <= target))?)
    }

    /// Products that should be refetched, pinned ones included.
    pub fn stale_for_refresh(&self, now: DateTime<Utc>, threshold_hours: i64) -> Result<Vec<Product>> {
        let products = self.products.get_all()?;
        Ok(select_stale_for_refresh(&products, now, threshold_hours)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Number of cached products.
    pub fn cache_size(&self) -> Result<usize> {
        Ok(self.products.count()?)
    }

    /// Lookup and removal counters, with the current entry count.
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.products.count()?);
        Ok(stats)
    }

    // == Cache Writes ==
    /// Inserts or replaces a product.
    pub fn cache_product(&mut self, product: Product) -> Result<()> {
        Ok(self.products.insert_or_replace(product)?)
    }

    /// Inserts or replaces several products.
    pub fn cache_products(&mut self, products: Vec<Product>) -> Result<()> {
        Ok(self.products.insert_all(products)?)
    }

    /// Counts one access of the product at `now`.
    pub fn record_access(&mut self, product_id: &str, now: DateTime<Utc>) -> Result<()> {
        self.modify(product_id, |p| *p = p.with_access_recorded(now))
            .map(|_| ())
    }

    /// Stores an externally computed score, clamped to [0, 1].
    pub fn update_cache_score(&mut self, product_id: &str, score: f32) -> Result<()> {
        let score = normalize_score(score);
        self.modify(product_id, |p| p.cache_score = score).map(|_| ())
    }

    /// Recomputes and stores the score of a product from its recent accesses.
    pub fn refresh_cache_score(
        &mut self,
        product_id: &str,
        recent_access_count: u32,
        now: DateTime<Utc>,
    ) -> Result<f32> {
        let updated = self.modify(product_id, |p| {
            let score = recompute_score(p, recent_access_count, hours_since_access(p, now));
            p.cache_score = score;
        })?;
        Ok(updated.cache_score)
    }

    // == Wishlist ==
    /// Adds a product to the wishlist, pinning it.
    pub fn add_to_wishlist(&mut self, product_id: &str, now: DateTime<Utc>) -> Result<Product> {
        self.modify(product_id, |p| *p = p.with_wishlist(now))
    }

    /// Removes a product from the wishlist.
    pub fn remove_from_wishlist(&mut self, product_id: &str) -> Result<Product> {
        self.modify(product_id, |p| *p = p.without_wishlist())
    }

    // == Price Tracking ==
    /// Starts tracking a product's price, optionally with a target.
    ///
    /// # Errors
    /// `InvalidRequest` for a negative or non-finite target.
    pub fn start_tracking(
        &mut self,
        product_id: &str,
        price_target: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        pricing::validate_price_target(price_target)?;
        let product = self.modify(product_id, |p| {
            *p = pricing::start_tracking(p, price_target, now)
        })?;
        info!(
            "Started tracking product {} (target: {:?})",
            product_id, price_target
        );
        Ok(product)
    }

    /// Stops tracking a product and clears its target.
    pub fn stop_tracking(&mut self, product_id: &str) -> Result<Product> {
        let product = self.modify(product_id, |p| *p = pricing::stop_tracking(p))?;
        info!("Stopped tracking product {}", product_id);
        Ok(product)
    }

    /// # Errors
    /// `InvalidState` if the product is not tracked.
    pub fn set_price_target(&mut self, product_id: &str, price_target: Option<f64>) -> Result<Product> {
        let product = self.require(product_id)?;
        let updated = pricing::set_price_target(&product, price_target)?;
        self.products.insert_or_replace(updated.clone())?;
        Ok(updated)
    }

    // == Price Observation ==
    /// Applies a newly observed price to a cached product.
    ///
    /// The alert is evaluated against the cached price before it is
    /// replaced. An observation is appended when the price or currency
    /// differs from the cached one, or when the product has no history yet.
    pub fn observe_price(
        &mut self,
        product_id: &str,
        new_price: f64,
        currency: &str,
        policy: &PriceAlertPolicy,
        now: DateTime<Utc>,
    ) -> Result<PriceUpdate> {
        if !new_price.is_finite() || new_price < 0.0 {
            return Err(CompanionError::InvalidRequest(format!(
                "Observed price must be a non-negative number, got {}",
                new_price
            )));
        }

        let product = self.require(product_id)?;
        let alert = policy
            .should_alert(&product, new_price)
            .then(|| PriceChange::between(product.price, new_price));

        let history = self.history.query(|o| o.product_id == product_id)?;
        let is_new_price = new_price != product.price || currency != product.currency;

        let (observation, change) = if is_new_price || history.is_empty() {
            let (observation, change) =
                record_price_observation(product_id, new_price, currency, &history, now);
            (Some(self.history.append(observation)?), change)
        } else {
            (None, None)
        };

        self.products.update(product_id, |p| {
            p.price = new_price;
            p.currency = currency.to_string();
            p.cached_at = now;
        })?;

        if let Some(change) = &alert {
            info!(
                "Price drop on tracked product {}: {:.2} -> {:.2} ({:.1}%)",
                product_id, product.price, new_price, change.percent_change
            );
        }

        Ok(PriceUpdate {
            observation,
            change,
            alert,
        })
    }

    /// Up to `limit` observations of a product, newest first.
    pub fn price_history(&self, product_id: &str, limit: usize) -> Result<Vec<PriceObservation>> {
        let mut history = self.history.query(|o| o.product_id == product_id)?;
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        history.truncate(limit);
        Ok(history)
    }

    /// Observations of a product within `[start, end]`, oldest first.
    pub fn price_history_in_range(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>> {
        let mut history = self.history.query(|o| {
            o.product_id == product_id && o.timestamp >= start && o.timestamp <= end
        })?;
        history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(history)
    }

    /// Deletes observations strictly older than `cutoff`.
    pub fn clean_old_price_history(&mut self, cutoff: DateTime<Utc>) -> Result<usize> {
        let removed = self.history.delete_where(|o| o.timestamp < cutoff)?;
        if removed > 0 {
            info!("Price history retention: removed {} observations", removed);
        }
        Ok(removed)
    }

    /// Deletes observations older than `retention_days` relative to `now`.
    pub fn prune_price_history(&mut self, retention_days: i64, now: DateTime<Utc>) -> Result<usize> {
        self.clean_old_price_history(window::days_before(now, retention_days)?)
    }

    // == Cache Management ==
    /// Evicts up to `limit` of the lowest-value unpinned products.
    ///
    /// Pin status is checked again at deletion time, so a product pinned
    /// after selection survives. Returns the number of products removed.
    pub fn evict_low_value(&mut self, limit: usize) -> Result<usize> {
        let products = self.products.get_all()?;
        let candidates = select_eviction_candidates(&products, limit);
        if candidates.is_empty() {
            return Ok(0);
        }

        let removed = self
            .products
            .delete_by_ids_where(&candidates, |p| !p.is_pinned())?;
        if removed < candidates.len() {
            debug!(
                "Cache eviction: {} candidates skipped at deletion time",
                candidates.len() - removed
            );
        }

        self.stats.record_evictions(removed);
        info!("Cache eviction: removed {} low-value products", removed);
        Ok(removed)
    }

    /// Deletes unpinned products cached more than `max_age_hours` ago.
    pub fn clear_stale_cache(&mut self, now: DateTime<Utc>, max_age_hours: i64) -> Result<usize> {
        let products = self.products.get_all()?;
        let doomed: Vec<String> = select_stale_for_deletion(&products, now, max_age_hours)
            .into_iter()
            .collect();
        if doomed.is_empty() {
            debug!("Stale cleanup: no stale products found");
            return Ok(0);
        }

        let removed = self.products.delete_by_ids_where(&doomed, |p| {
            !p.is_pinned() && is_stale(p, now, max_age_hours)
        })?;

        self.stats.record_stale_removed(removed);
        info!("Stale cleanup: removed {} products", removed);
        Ok(removed)
    }

    /// Evicts low-value products until at most `max_entries` remain or only
    /// pinned products are left over the limit.
    pub fn enforce_capacity(&mut self, max_entries: usize, batch_size: usize) -> Result<usize> {
        let batch_size = batch_size.max(1);
        let mut total = 0;

        loop {
            let size = self.products.count()?;
            if size <= max_entries {
                break;
            }
            let removed = self.evict_low_value((size - max_entries).min(batch_size))?;
            if removed == 0 {
                break;
            }
            total += removed;
        }

        Ok(total)
    }

    /// Removes every cached product, pinned ones included.
    pub fn clear_cache(&mut self) -> Result<usize> {
        let removed = self.products.clear()?;
        info!("Cache cleared: removed {} products", removed);
        Ok(removed)
    }

    // == Helpers ==
    fn require(&self, product_id: &str) -> Result<Product> {
        self.find(product_id)?
            .ok_or_else(|| CompanionError::NotFound(product_id.to_string()))
    }

    /// Atomically modifies one product and returns the stored result.
    fn modify<F>(&mut self, product_id: &str, apply: F) -> Result<Product>
    where
        F: FnOnce(&mut Product),
    {
        let mut updated = None;
        let matched = self.products.update(product_id, |p| {
            apply(p);
            updated = Some(p.clone());
        })?;

        match updated {
            Some(product) if matched => Ok(product),
            _ => Err(CompanionError::NotFound(product_id.to_string())),
        }
    }
}

fn sort_by_last_access_desc(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.last_accessed_at
            .cmp(&a.last_accessed_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
