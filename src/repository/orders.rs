//! Order Repository

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{CompanionError, Result};
use crate::models::{Order, OrderStatus};
use crate::store::EntryStore;

#[derive(Debug)]
pub struct OrderRepository<S> {
    orders: S,
}

impl<S> OrderRepository<S>
where
    S: EntryStore<Order>,
{
    /// Creates a repository over the given order store.
    pub fn new(orders: S) -> Self {
        Self { orders }
    }

    /// Every order, newest order date first.
    pub fn all(&self) -> Result<Vec<Order>> {
        let mut orders = self.orders.get_all()?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Looks up one order.
    pub fn get(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.orders.get_by_id(order_id)?)
    }

    /// Orders that are not yet delivered, cancelled or refunded.
    pub fn active(&self) -> Result<Vec<Order>> {
        let mut orders = self.orders.query(|o| o.status.is_active())?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Orders with `status`, newest first.
    pub fn by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let mut orders = self.orders.query(|o| o.status == status)?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Inserts or replaces an order.
    pub fn save(&mut self, order: Order) -> Result<()> {
        Ok(self.orders.insert_or_replace(order)?)
    }

    /// Sets the status of an order.
    ///
    /// # Errors
    /// `NotFound` if the order does not exist.
    pub fn update_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.modify(order_id, |o| {
            o.status = status;
            o.last_update_at = now;
        })?;
        info!("Order {} is now {:?}", order_id, status);
        Ok(())
    }

    /// Records the carrier tracking number of an order.
    pub fn update_tracking(
        &mut self,
        order_id: &str,
        tracking_number: &str,
        carrier: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.modify(order_id, |o| {
            o.tracking_number = Some(tracking_number.to_string());
            o.carrier = Some(carrier.to_string());
            o.last_update_at = now;
        })
    }

    /// Deletes an order. Returns whether it existed.
    pub fn delete(&mut self, order_id: &str) -> Result<bool> {
        Ok(self.orders.delete_by_ids(&[order_id.to_string()])? > 0)
    }

    fn modify<F>(&mut self, order_id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Order),
    {
        if self.orders.update(order_id, apply)? {
            Ok(())
        } else {
            Err(CompanionError::NotFound(order_id.to_string()))
        }
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
}
