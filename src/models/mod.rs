//! Entity models for the companion cache
//!
//! Products, price history, orders, user preferences and interaction events.

pub mod interaction;
pub mod order;
pub mod preferences;
pub mod price;
pub mod product;

// Re-export commonly used types
pub use interaction::{InteractionEvent, InteractionType};
pub use order::{Order, OrderStatus};
pub use preferences::{
    Density, Layout, NotificationPreferences, Theme, UserPreferences, DEFAULT_USER_ID,
};
pub use price::{PriceChange, PriceDirection, PriceObservation};
pub use product::{
    normalize_score, PriceTracking, Product, DEFAULT_CACHE_SCORE, DEFAULT_CURRENCY,
};
