//! Companion Cache - maintenance daemon
//!
//! Hosts the cache state and runs periodic maintenance until shutdown.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use companion_cache::{spawn_maintenance_task, AppState, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the in-memory repositories
/// 4. Start the background maintenance task
/// 5. Wait for SIGINT/SIGTERM and abort the task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "companion_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Companion Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_cached_products={}, max_cache_age={}h, price_drop_alert={}%, maintenance_interval={}s",
        config.max_cached_products,
        config.max_cache_age_hours,
        config.price_drop_alert_percent,
        config.maintenance_interval
    );

    let state = AppState::from_config(&config);
    info!("Repositories initialized");

    let maintenance_handle = spawn_maintenance_task(state, config.maintenance_interval);
    info!("Background maintenance task started");

    shutdown_signal().await?;

    maintenance_handle.abort();
    warn!("Maintenance task aborted");
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("Failed to install Ctrl+C handler")?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .context("Failed to install Ctrl+C handler")?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}
