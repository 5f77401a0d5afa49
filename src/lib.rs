//! Companion Cache - local product cache for a shopping companion
//!
//! Keeps a bounded cache of products with scored eviction and staleness
//! tracking, records price history, raises price-drop alerts on tracked
//! products and logs user interactions.

pub mod cache;
pub mod config;
pub mod error;
pub mod interactions;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod state;
pub mod store;
pub mod tasks;
pub mod window;

pub use config::Config;
pub use error::{CompanionError, Result};
pub use state::AppState;
pub use tasks::{run_maintenance, spawn_maintenance_task, MaintenanceReport};
