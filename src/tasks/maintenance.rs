//! Cache Maintenance Task
//!
//! Periodic pass that rescores products, drops stale and low-value entries
//! and prunes the append-only logs.
//!
//! A pass is idempotent: aborting it midway and running it again later
//! leaves the cache in the same state as one uninterrupted pass.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::state::AppState;
use crate::window;

/// Shortest delay between two passes
pub const MIN_MAINTENANCE_INTERVAL_SECS: u64 = 1;

// == Maintenance Report ==
/// What one maintenance pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub rescored: usize,
    pub stale_removed: usize,
    pub evicted: usize,
    pub interactions_pruned: usize,
    pub price_history_pruned: usize,
}

impl MaintenanceReport {
    /// True when nothing was deleted.
    pub fn removed_nothing(&self) -> bool {
        self.stale_removed == 0
            && self.evicted == 0
            && self.interactions_pruned == 0
            && self.price_history_pruned == 0
    }
}

/// Runs one maintenance pass as of `now`.
///
/// 1. Rescore every product from its accesses within the score window
/// 2. Delete unpinned products older than the maximum cache age
/// 3. Evict low-value products above the capacity
/// 4. Prune interactions and price history past retention
pub async fn run_maintenance(state: &AppState, now: DateTime<Utc>) -> Result<MaintenanceReport> {
    let config = &state.config;
    let window_start = window::hours_before(now, config.score_window_hours)?;

    let access_counts = state
        .interactions
        .read()
        .await
        .access_counts_since(window_start)?;

    let mut report = MaintenanceReport::default();
    {
        let mut products = state.products.write().await;

        let ids: Vec<String> = products.all()?.into_iter().map(|p| p.id).collect();
        for id in &ids {
            let recent = access_counts.get(id).copied().unwrap_or(0);
            products.refresh_cache_score(id, recent, now)?;
        }
        report.rescored = ids.len();

        report.stale_removed = products.clear_stale_cache(now, config.max_cache_age_hours)?;
        report.evicted =
            products.enforce_capacity(config.max_cached_products, config.eviction_batch_size)?;
        report.price_history_pruned =
            products.prune_price_history(config.price_history_retention_days, now)?;
    }

    report.interactions_pruned = state
        .interactions
        .write()
        .await
        .prune_older_than(config.interaction_retention_days, now)?;

    Ok(report)
}

/// Spawns a background task that runs a maintenance pass every
/// `interval_secs` seconds, floored at [`MIN_MAINTENANCE_INTERVAL_SECS`].
///
/// A failed pass is logged and the task keeps running.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let state = AppState::from_config(&config);
/// let handle = spawn_maintenance_task(state.clone(), 3600);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(state: AppState, interval_secs: u64) -> JoinHandle<()> {
    if interval_secs < MIN_MAINTENANCE_INTERVAL_SECS {
        warn!(
            "Maintenance interval of {} seconds raised to {}",
            interval_secs, MIN_MAINTENANCE_INTERVAL_SECS
        );
    }
    let interval_secs = interval_secs.max(MIN_MAINTENANCE_INTERVAL_SECS);
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache maintenance task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match run_maintenance(&state, Utc::now()).await {
                Ok(report) if report.removed_nothing() => {
                    debug!("Maintenance: rescored {} products, nothing removed", report.rescored);
                }
                Ok(report) => {
                    info!(
                        "Maintenance: rescored={} stale_removed={} evicted={} interactions_pruned={} price_history_pruned={}",
                        report.rescored,
                        report.stale_removed,
                        report.evicted,
                        report.interactions_pruned,
                        report.price_history_pruned
                    );
                }
                Err(err) => warn!("Maintenance pass failed: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::CompanionError;
    use crate::models::{InteractionEvent, InteractionType, Product};
    use crate::pricing::PriceAlertPolicy;

    fn aged(id: &str, hours: i64, now: DateTime<Utc>) -> Product {
        let mut product = Product::new(id, id, 10.0, now);
        product.cached_at = now - chrono::Duration::hours(hours);
        product
    }

    #[tokio::test]
    async fn test_pass_removes_stale_and_prunes_logs() {
        let now = Utc::now();
        let state = AppState::from_config(&Config::default());
        {
            let mut products = state.products.write().await;
            products.cache_product(aged("stale", 200, now)).unwrap();
            products.cache_product(aged("stale_wish", 200, now)).unwrap();
            products.add_to_wishlist("stale_wish", now).unwrap();
            products.cache_product(aged("fresh", 1, now)).unwrap();
            let long_ago = now - chrono::Duration::days(100);
            products
                .observe_price("fresh", 10.0, "USD", &PriceAlertPolicy::default(), long_ago)
                .unwrap();
            // Observing moved cached_at back; re-cache to keep the product fresh
            products.cache_product(aged("fresh", 1, now)).unwrap();

            let mut interactions = state.interactions.write().await;
            interactions
                .record(InteractionEvent::new(
                    InteractionType::ScreenView,
                    "home",
                    now - chrono::Duration::days(40),
                ))
                .unwrap();
        }

        let report = run_maintenance(&state, now).await.unwrap();
        assert_eq!(report.rescored, 3);
        assert_eq!(report.stale_removed, 1);
        assert_eq!(report.evicted, 0);
        assert_eq!(report.interactions_pruned, 1);
        assert_eq!(report.price_history_pruned, 1);

        let products = state.products.read().await;
        assert!(products.find("stale").unwrap().is_none());
        assert!(products.find("stale_wish").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pass_rescoring_drives_eviction() {
        let now = Utc::now();
        let config = Config {
            max_cached_products: 1,
            ..Config::default()
        };
        let state = AppState::from_config(&config);
        {
            let mut products = state.products.write().await;
            products.cache_product(aged("popular", 0, now)).unwrap();
            products.cache_product(aged("ignored", 0, now)).unwrap();
            products.record_access("popular", now).unwrap();
            products.record_access("ignored", now - chrono::Duration::hours(48)).unwrap();
        }
        {
            let mut interactions = state.interactions.write().await;
            for _ in 0..5 {
                interactions.record_product_view("popular", 1000, now).unwrap();
            }
        }

        let report = run_maintenance(&state, now).await.unwrap();
        assert_eq!(report.evicted, 1);

        let products = state.products.read().await;
        assert!(products.find("popular").unwrap().is_some());
        assert!(products.find("ignored").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pass_is_idempotent() {
        let now = Utc::now();
        let state = AppState::from_config(&Config::default());
        state
            .products
            .write()
            .await
            .cache_product(aged("stale", 500, now))
            .unwrap();

        let first = run_maintenance(&state, now).await.unwrap();
        let second = run_maintenance(&state, now).await.unwrap();
        assert_eq!(first.stale_removed, 1);
        assert!(second.removed_nothing());
    }

    #[tokio::test]
    async fn test_maintenance_task_runs_periodically() {
        let now = Utc::now();
        let state = AppState::from_config(&Config::default());
        state
            .products
            .write()
            .await
            .cache_product(aged("stale", 500, now))
            .unwrap();

        let handle = spawn_maintenance_task(state.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(state.products.read().await.cache_size().unwrap(), 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_maintenance_task_can_be_aborted() {
        let state = AppState::from_config(&Config::default());
        let handle = spawn_maintenance_task(state, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_out_of_range_score_window_is_an_error() {
        let now = Utc::now();
        let config = Config {
            score_window_hours: i64::MAX,
            ..Config::default()
        };
        let state = AppState::from_config(&config);
        state
            .products
            .write()
            .await
            .cache_product(aged("stale", 500, now))
            .unwrap();

        let result = run_maintenance(&state, now).await;
        assert!(matches!(result, Err(CompanionError::InvalidRequest(_))));
        assert_eq!(state.products.read().await.cache_size().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_retention_is_an_error() {
        let now = Utc::now();
        for config in [
            Config {
                interaction_retention_days: i64::MAX,
                ..Config::default()
            },
            Config {
                price_history_retention_days: i64::MAX,
                ..Config::default()
            },
        ] {
            let state = AppState::from_config(&config);
            let result = run_maintenance(&state, now).await;
            assert!(matches!(result, Err(CompanionError::InvalidRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_task_survives_failing_passes() {
        let config = Config {
            score_window_hours: i64::MAX,
            ..Config::default()
        };
        let state = AppState::from_config(&config);
        let handle = spawn_maintenance_task(state, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!handle.is_finished(), "Task should keep running after a failed pass");
        handle.abort();
    }

    #[tokio::test]
    async fn test_zero_interval_is_floored() {
        let now = Utc::now();
        let state = AppState::from_config(&Config::default());
        state
            .products
            .write()
            .await
            .cache_product(aged("stale", 500, now))
            .unwrap();

        let handle = spawn_maintenance_task(state.clone(), 0);
        tokio::time::sleep(Duration::from_millis(300)).await;

        // No pass has run yet
        assert_eq!(state.products.read().await.cache_size().unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(state.products.read().await.cache_size().unwrap(), 0);
        handle.abort();
    }
}
