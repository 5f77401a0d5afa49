//! Price History
//!
//! Builds new observations and derives the change against the previous one.

use chrono::{DateTime, Utc};

use crate::models::{PriceChange, PriceObservation};

/// Observations returned by a history query when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Age after which observations are pruned
pub const DEFAULT_PRICE_HISTORY_RETENTION_DAYS: i64 = 90;

// == Latest Observation ==
/// Most recent observation of `product_id` in `history`.
///
/// `history` may contain other products and need not be sorted. Equal
/// timestamps are resolved by the higher sequence id.
pub fn latest_observation<'a>(
    product_id: &str,
    history: &'a [PriceObservation],
) -> Option<&'a PriceObservation> {
    history
        .iter()
        .filter(|o| o.product_id == product_id)
        .max_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)))
}

// == Record Observation ==
/// Creates the observation for `new_price` at `now` and its change against
/// the latest prior observation of the same product.
///
/// The change is `None` when the product has no prior observation.
pub fn record_price_observation(
    product_id: &str,
    new_price: f64,
    currency: &str,
    history: &[PriceObservation],
    now: DateTime<Utc>,
) -> (PriceObservation, Option<PriceChange>) {
    let observation = PriceObservation::new(product_id, new_price, currency, now);
    let change = latest_observation(product_id, history).map(|prev| observation.change_from(prev.price));
    (observation, change)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceDirection;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 7, 7, 0, 0).unwrap()
    }

    fn observation(id: u64, product: &str, price: f64, hours_ago: i64) -> PriceObservation {
        PriceObservation {
            id,
            ..PriceObservation::new(product, price, "USD", now() - Duration::hours(hours_ago))
        }
    }

    #[test]
    fn test_first_observation_has_no_change() {
        let (obs, change) = record_price_observation("p1", 50.0, "USD", &[], now());
        assert_eq!(obs.price, 50.0);
        assert_eq!(obs.timestamp, now());
        assert!(change.is_none());
    }

    #[test]
    fn test_change_against_prior() {
        let history = vec![observation(1, "p1", 100.0, 5)];
        let (_, change) = record_price_observation("p1", 90.0, "USD", &history, now());

        let change = change.unwrap();
        assert_eq!(change.difference, -10.0);
        assert_eq!(change.percent_change, -10.0);
        assert_eq!(change.direction, PriceDirection::Down);
    }

    #[test]
    fn test_uses_latest_of_same_product() {
        let history = vec![
            observation(3, "p1", 80.0, 1),
            observation(1, "p1", 100.0, 10),
            observation(4, "other", 5.0, 0),
        ];
        let (_, change) = record_price_observation("p1", 80.0, "USD", &history, now());
        assert_eq!(change.unwrap().direction, PriceDirection::Stable);
    }

    #[test]
    fn test_other_products_ignored() {
        let history = vec![observation(1, "other", 100.0, 1)];
        let (_, change) = record_price_observation("p1", 90.0, "USD", &history, now());
        assert!(change.is_none());
    }

    #[test]
    fn test_timestamp_tie_prefers_higher_id() {
        let history = vec![observation(2, "p1", 70.0, 1), observation(1, "p1", 60.0, 1)];
        assert_eq!(latest_observation("p1", &history).unwrap().id, 2);
    }
}
