//! Application State
//!
//! Shared handles to the repositories, wired over in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::interactions::InteractionLog;
use crate::models::{
    InteractionEvent, Order, PriceObservation, Product, UserPreferences,
};
use crate::pricing::{LoggingAlertSink, PriceAlertSink};
use crate::repository::{OrderRepository, PreferencesRepository, PriceUpdate, ProductRepository};
use crate::store::MemoryStore;

pub type Products = ProductRepository<MemoryStore<Product>, MemoryStore<PriceObservation>>;
pub type Interactions = InteractionLog<MemoryStore<InteractionEvent>>;
pub type Orders = OrderRepository<MemoryStore<Order>>;
pub type Preferences = PreferencesRepository<MemoryStore<UserPreferences>>;

/// Repositories shared across tasks.
///
/// Each repository sits behind its own lock; no operation here holds more
/// than one write lock at a time.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<RwLock<Products>>,
    pub interactions: Arc<RwLock<Interactions>>,
    pub orders: Arc<RwLock<Orders>>,
    pub preferences: Arc<RwLock<Preferences>>,
    /// Receives price drop alerts
    pub alerts: Arc<dyn PriceAlertSink>,
    pub config: Config,
}

impl AppState {
    /// Creates empty state delivering alerts to `alerts`.
    pub fn new(config: Config, alerts: Arc<dyn PriceAlertSink>) -> Self {
        Self {
            products: Arc::new(RwLock::new(ProductRepository::new(
                MemoryStore::new(),
                MemoryStore::new(),
            ))),
            interactions: Arc::new(RwLock::new(InteractionLog::new(MemoryStore::new()))),
            orders: Arc::new(RwLock::new(OrderRepository::new(MemoryStore::new()))),
            preferences: Arc::new(RwLock::new(PreferencesRepository::new(MemoryStore::new()))),
            alerts,
            config,
        }
    }

    /// Creates empty state that logs alerts.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.clone(), Arc::new(LoggingAlertSink))
    }

    /// Records that the user opened a product: counts the access and logs a
    /// product view.
    pub async fn view_product(
        &self,
        product_id: &str,
        duration_ms: u64,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        let product = {
            let mut products = self.products.write().await;
            products.record_access(product_id, now)?;
            products.get(product_id)?
        };

        self.interactions
            .write()
            .await
            .record_product_view(product_id, duration_ms, now)?;

        Ok(product)
    }

    /// Applies an observed price and forwards any alert to the sink, unless
    /// the user's preferences silence it at this hour.
    pub async fn observe_price(
        &self,
        product_id: &str,
        price: f64,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<PriceUpdate> {
        let policy = self.config.alert_policy();
        let update = self
            .products
            .write()
            .await
            .observe_price(product_id, price, currency, &policy, now)?;

        if let Some(change) = &update.alert {
            let preferences = self.preferences.read().await.get()?;
            if preferences.allows_price_drop_alert(now.hour()) {
                self.alerts.notify(product_id, change);
            } else {
                debug!("Price drop alert for {} suppressed by preferences", product_id);
            }
        }

        Ok(update)
    }
}
