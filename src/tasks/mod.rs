//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache is live.
//!
//! # Tasks
//! - Maintenance: rescoring, stale cleanup, capacity eviction and log retention

mod maintenance;

pub use maintenance::{
    run_maintenance, spawn_maintenance_task, MaintenanceReport, MIN_MAINTENANCE_INTERVAL_SECS,
};
