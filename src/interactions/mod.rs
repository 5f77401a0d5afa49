//! Interactions Module
//!
//! Recording and aggregation of user interaction events. The log is the
//! source of the "recent activity" signal used when rescoring products.

mod log;

pub use log::{
    InteractionLog, DEFAULT_BY_TYPE_LIMIT, DEFAULT_INTERACTION_RETENTION_DAYS,
    DEFAULT_RECENT_LIMIT,
};
