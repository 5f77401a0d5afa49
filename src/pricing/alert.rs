//! Price Drop Alerts
//!
//! Decides whether a newly observed price should alert the user, and the
//! sink alerts are delivered to.

use tracing::info;

use crate::models::{PriceChange, Product};

/// Percent drop from the cached price that triggers an alert
pub const DEFAULT_PRICE_DROP_PERCENT: f64 = 10.0;

// == Alert Policy ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceAlertPolicy {
    /// Minimum drop, in percent of the cached price, that alerts
    pub min_drop_percent: f64,
}

impl Default for PriceAlertPolicy {
    fn default() -> Self {
        Self {
            min_drop_percent: DEFAULT_PRICE_DROP_PERCENT,
        }
    }
}

impl PriceAlertPolicy {
    /// Creates a policy alerting at `min_drop_percent` or more.
    pub fn new(min_drop_percent: f64) -> Self {
        Self { min_drop_percent }
    }

    /// Whether moving from the cached price of `entry` to `new_price`
    /// should alert.
    ///
    /// Untracked products never alert. Tracked products alert when the drop
    /// reaches `min_drop_percent`, or when a target is set and `new_price`
    /// is at or below it. A cached price of zero or less skips the percent
    /// check.
    pub fn should_alert(&self, entry: &Product, new_price: f64) -> bool {
        let Some(tracking) = entry.tracking else {
            return false;
        };

        if entry.price > 0.0 {
            let drop_percent = (entry.price - new_price) / entry.price * 100.0;
            if drop_percent >= self.min_drop_percent {
                return true;
            }
        }

        matches!(tracking.price_target, Some(target) if new_price <= target)
    }
}

/// [`PriceAlertPolicy::should_alert`] with the default 10% threshold.
pub fn should_alert_on_price_drop(entry: &Product, new_price: f64) -> bool {
    PriceAlertPolicy::default().should_alert(entry, new_price)
}

// == Alert Sink ==
/// Receives price drop alerts. Delivery is up to the implementation.
pub trait PriceAlertSink: Send + Sync {
    fn notify(&self, product_id: &str, change: &PriceChange);
}

impl<F> PriceAlertSink for F
where
    F: Fn(&str, &PriceChange) + Send + Sync,
{
    fn notify(&self, product_id: &str, change: &PriceChange) {
        self(product_id, change)
    }
}

/// Sink that only logs alerts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAlertSink;

impl PriceAlertSink for LoggingAlertSink {
    fn notify(&self, product_id: &str, change: &PriceChange) {
        info!(
            "Price drop alert: product={} difference={:.2} percent={:.1}",
            product_id, change.difference, change.percent_change
        );
    }
}
