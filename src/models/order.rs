//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Order Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Display text for the status.
    pub fn status_text(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Pending",
            OrderStatus::Processing => "Processing Order",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

    /// False once the order has reached a terminal state.
    pub fn is_active(self) -> bool {
        !matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }
}

// == Order ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub product_ids: Vec<String>,
    pub total_amount: f64,
    pub currency: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub shipping_address: Option<String>,
    pub last_update_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order in the default currency.
    pub fn new(
        order_id: impl Into<String>,
        product_ids: Vec<String>,
        total_amount: f64,
        order_date: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            product_ids,
            total_amount,
            currency: crate::models::DEFAULT_CURRENCY.to_string(),
            order_date,
            status: OrderStatus::Pending,
            tracking_number: None,
            carrier: None,
            estimated_delivery: None,
            shipping_address: None,
            last_update_at: order_date,
        }
    }

    /// Display text of the order's status.
    pub fn status_text(&self) -> &'static str {
        self.status.status_text()
    }

    /// Whole days until the estimated delivery, never negative.
    ///
    /// Returns `None` when no estimate is known.
    pub fn days_until_delivery(&self, now: DateTime<Utc>) -> Option<i64> {
        self.estimated_delivery
            .map(|estimate| (estimate - now).num_days().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::OutForDelivery.is_active());
        assert!(!OrderStatus::Delivered.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
        assert!(!OrderStatus::Refunded.is_active());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(OrderStatus::InTransit.status_text(), "In Transit");
        assert_eq!(OrderStatus::Pending.status_text(), "Order Pending");
    }

    #[test]
    fn test_days_until_delivery() {
        let now = Utc::now();
        let mut order = Order::new("o1", vec!["p1".to_string()], 12.5, now);
        assert_eq!(order.days_until_delivery(now), None);

        order.estimated_delivery = Some(now + Duration::days(3) + Duration::hours(2));
        assert_eq!(order.days_until_delivery(now), Some(3));

        order.estimated_delivery = Some(now - Duration::days(2));
        assert_eq!(order.days_until_delivery(now), Some(0));
    }
}
