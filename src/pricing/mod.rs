//! Pricing Module
//!
//! Price tracking state, price drop alert evaluation and price history.

mod alert;
mod history;
mod tracking;


pub use alert::{
    should_alert_on_price_drop, LoggingAlertSink, PriceAlertPolicy, PriceAlertSink,
    DEFAULT_PRICE_DROP_PERCENT,
};
pub use history::{
    latest_observation, record_price_observation, DEFAULT_HISTORY_LIMIT,
    DEFAULT_PRICE_HISTORY_RETENTION_DAYS,
};
pub use tracking::{set_price_target, start_tracking, stop_tracking, validate_price_target};
