//! Configuration Module
//!
//! Loads cache and retention settings from environment variables.

use std::env;
use std::str::FromStr;

use crate::pricing::PriceAlertPolicy;

/// Cache, alert and retention settings.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Product count above which low-value products are evicted
    pub max_cached_products: usize,
    /// Products evicted per eviction round
    pub eviction_batch_size: usize,
    /// Age in hours after which a product should be refreshed
    pub stale_threshold_hours: i64,
    /// Age in hours after which an unpinned product is deleted
    pub max_cache_age_hours: i64,
    /// Percent drop of a tracked product's price that triggers an alert
    pub price_drop_alert_percent: f64,
    /// Days of price history kept
    pub price_history_retention_days: i64,
    /// Days of interaction events kept
    pub interaction_retention_days: i64,
    /// Hours of interactions counted when rescoring products
    pub score_window_hours: i64,
    /// Seconds between maintenance passes
    pub maintenance_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHED_PRODUCTS` (default: 500)
    /// - `EVICTION_BATCH_SIZE` (default: 10)
    /// - `STALE_THRESHOLD_HOURS` (default: 24)
    /// - `MAX_CACHE_AGE_HOURS` (default: 168)
    /// - `PRICE_DROP_ALERT_PERCENT` (default: 10.0)
    /// - `PRICE_HISTORY_RETENTION_DAYS` (default: 90)
    /// - `INTERACTION_RETENTION_DAYS` (default: 30)
    /// - `SCORE_WINDOW_HOURS` (default: 72)
    /// - `MAINTENANCE_INTERVAL` - seconds (default: 3600)
    ///
    /// Unset or unparsable variables fall back to their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cached_products: env_or("MAX_CACHED_PRODUCTS", defaults.max_cached_products),
            eviction_batch_size: env_or("EVICTION_BATCH_SIZE", defaults.eviction_batch_size),
            stale_threshold_hours: env_or("STALE_THRESHOLD_HOURS", defaults.stale_threshold_hours),
            max_cache_age_hours: env_or("MAX_CACHE_AGE_HOURS", defaults.max_cache_age_hours),
            price_drop_alert_percent: env_or(
                "PRICE_DROP_ALERT_PERCENT",
                defaults.price_drop_alert_percent,
            ),
            price_history_retention_days: env_or(
                "PRICE_HISTORY_RETENTION_DAYS",
                defaults.price_history_retention_days,
            ),
            interaction_retention_days: env_or(
                "INTERACTION_RETENTION_DAYS",
                defaults.interaction_retention_days,
            ),
            score_window_hours: env_or("SCORE_WINDOW_HOURS", defaults.score_window_hours),
            maintenance_interval: env_or("MAINTENANCE_INTERVAL", defaults.maintenance_interval),
        }
    }

    /// Alert policy using the configured drop percentage.
    pub fn alert_policy(&self) -> PriceAlertPolicy {
        PriceAlertPolicy::new(self.price_drop_alert_percent)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cached_products: 500,
            eviction_batch_size: crate::cache::DEFAULT_EVICTION_BATCH,
            stale_threshold_hours: crate::cache::DEFAULT_STALE_THRESHOLD_HOURS,
            max_cache_age_hours: crate::cache::DEFAULT_MAX_CACHE_AGE_HOURS,
            price_drop_alert_percent: crate::pricing::DEFAULT_PRICE_DROP_PERCENT,
            price_history_retention_days: crate::pricing::DEFAULT_PRICE_HISTORY_RETENTION_DAYS,
            interaction_retention_days: crate::interactions::DEFAULT_INTERACTION_RETENTION_DAYS,
            score_window_hours: 72,
            maintenance_interval: 3600,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_cached_products, 500);
        assert_eq!(config.eviction_batch_size, 10);
        assert_eq!(config.stale_threshold_hours, 24);
        assert_eq!(config.max_cache_age_hours, 168);
        assert_eq!(config.price_drop_alert_percent, 10.0);
        assert_eq!(config.price_history_retention_days, 90);
        assert_eq!(config.interaction_retention_days, 30);
        assert_eq!(config.score_window_hours, 72);
        assert_eq!(config.maintenance_interval, 3600);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "MAX_CACHED_PRODUCTS",
            "EVICTION_BATCH_SIZE",
            "STALE_THRESHOLD_HOURS",
            "MAX_CACHE_AGE_HOURS",
            "PRICE_DROP_ALERT_PERCENT",
            "PRICE_HISTORY_RETENTION_DAYS",
            "INTERACTION_RETENTION_DAYS",
            "SCORE_WINDOW_HOURS",
            "MAINTENANCE_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.max_cached_products, 500);
        assert_eq!(config.max_cache_age_hours, 168);
        assert_eq!(config.maintenance_interval, 3600);
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        env::set_var("COMPANION_TEST_NUMBER", "not-a-number");
        assert_eq!(env_or("COMPANION_TEST_NUMBER", 7usize), 7);
        env::set_var("COMPANION_TEST_NUMBER", "12");
        assert_eq!(env_or("COMPANION_TEST_NUMBER", 7usize), 12);
        env::remove_var("COMPANION_TEST_NUMBER");
    }

    #[test]
    fn test_alert_policy_uses_percent() {
        let config = Config {
            price_drop_alert_percent: 20.0,
            ..Config::default()
        };
        assert_eq!(config.alert_policy().min_drop_percent, 20.0);
    }
}
