//! Price Tracking State
//!
//! Transitions between NOT_TRACKED and TRACKED. Each function returns an
//! updated copy; persisting it is up to the caller.

use chrono::{DateTime, Utc};

use crate::error::{CompanionError, Result};
use crate::models::{PriceTracking, Product};

// == Start Tracking ==
/// Marks `entry` as tracked since `now` with the given target.
///
/// Calling this on an already tracked product overwrites the target and
/// restarts the tracking clock. An invalid target (negative or not finite)
/// is dropped; callers wanting an error use [`validate_price_target`] first.
pub fn start_tracking(entry: &Product, price_target: Option<f64>, now: DateTime<Utc>) -> Product {
    Product {
        tracking: Some(PriceTracking {
            started_at: now,
            price_target: price_target.filter(|t| is_valid_target(*t)),
        }),
        ..entry.clone()
    }
}

// == Stop Tracking ==
/// Clears tracking state. A no-op on an untracked product.
pub fn stop_tracking(entry: &Product) -> Product {
    Product {
        tracking: None,
        ..entry.clone()
    }
}

// == Price Target ==
/// Replaces the target of a tracked product.
///
/// # Errors
/// - `InvalidRequest` if the target is negative or not finite
/// - `InvalidState` if the product is not tracked
pub fn set_price_target(entry: &Product, price_target: Option<f64>) -> Result<Product> {
    validate_price_target(price_target)?;

    let Some(tracking) = entry.tracking else {
        return Err(CompanionError::InvalidState(format!(
            "Product {} is not tracked",
            entry.id
        )));
    };

    Ok(Product {
        tracking: Some(PriceTracking {
            price_target,
            ..tracking
        }),
        ..entry.clone()
    })
}

/// Rejects negative or non-finite targets.
pub fn validate_price_target(price_target: Option<f64>) -> Result<()> {
    match price_target {
        Some(target) if !is_valid_target(target) => Err(CompanionError::InvalidRequest(format!(
            "Price target must be a non-negative number, got {}",
            target
        ))),
        _ => Ok(()),
    }
}

fn is_valid_target(target: f64) -> bool {
    target.is_finite() && target >= 0.0
}
