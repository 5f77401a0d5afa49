//! Repository Module
//!
//! Store-backed repositories. Each one owns the store handle it was built
//! with; nothing is global.

mod orders;
mod preferences;
mod products;

pub use orders::OrderRepository;
pub use preferences::PreferencesRepository;
pub use products::{PriceUpdate, ProductRepository};
