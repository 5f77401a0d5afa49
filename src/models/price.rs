//! Price History Model
//!
//! Append-only price observations and the change derived between two of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Price Direction ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceDirection {
    Up,
    Down,
    Stable,
}

// == Price Change ==
/// Difference between a price and the one observed before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    /// `current - previous`
    pub difference: f64,
    /// Difference as a percentage of the previous price
    pub percent_change: f64,
    pub direction: PriceDirection,
}

impl PriceChange {
    /// Computes the change from `previous` to `current`.
    ///
    /// A zero previous price yields a percent change of 0.0; the direction
    /// still follows the sign of the difference.
    pub fn between(previous: f64, current: f64) -> Self {
        let difference = current - previous;
        let percent_change = if previous == 0.0 {
            0.0
        } else {
            difference / previous * 100.0
        };

        let direction = if difference > 0.0 {
            PriceDirection::Up
        } else if difference < 0.0 {
            PriceDirection::Down
        } else {
            PriceDirection::Stable
        };

        Self {
            difference,
            percent_change,
            direction,
        }
    }
}

// == Price Observation ==
/// One observed price of a product. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Store-assigned sequence id, 0 until appended
    #[serde(default)]
    pub id: u64,
    pub product_id: String,
    pub price: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

impl PriceObservation {
    /// Creates an observation; the store assigns its id on append.
    pub fn new(
        product_id: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            product_id: product_id.into(),
            price,
            currency: currency.into(),
            timestamp,
        }
    }

    /// Change of this observation relative to an earlier price.
    pub fn change_from(&self, previous_price: f64) -> PriceChange {
        PriceChange::between(previous_price, self.price)
    }
}
