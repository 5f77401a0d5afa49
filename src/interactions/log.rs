//! Interaction Log
//!
//! Append-only log of user interactions. Rows are never mutated after they
//! are appended; the only removal is retention pruning by age.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{InteractionEvent, InteractionType};
use crate::store::{AppendStore, EntryStore};
use crate::window;

// == Public Constants ==
/// Events returned by `recent` when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 1000;

/// Events returned by `by_type` when no limit is given
pub const DEFAULT_BY_TYPE_LIMIT: usize = 100;

/// Age after which events are pruned
pub const DEFAULT_INTERACTION_RETENTION_DAYS: i64 = 30;

// == Interaction Log ==
#[derive(Debug)]
pub struct InteractionLog<S> {
    store: S,
}

impl<S> InteractionLog<S>
where
    S: AppendStore<InteractionEvent>,
{
    /// Creates a log over the given event store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // == Recording ==
    /// Appends one event and returns it with its assigned id.
    pub fn record(&mut self, event: InteractionEvent) -> Result<InteractionEvent> {
        let stored = self.store.append(event)?;
        debug!(
            "Recorded interaction {} ({:?}) on {}",
            stored.id, stored.kind, stored.screen_name
        );
        Ok(stored)
    }

    /// Appends events in order.
    pub fn record_all(&mut self, events: Vec<InteractionEvent>) -> Result<Vec<InteractionEvent>> {
        events.into_iter().map(|event| self.record(event)).collect()
    }

    /// Records time spent on a screen.
    pub fn record_screen_view(
        &mut self,
        screen_name: &str,
        duration_ms: u64,
        now: DateTime<Utc>,
    ) -> Result<InteractionEvent> {
        self.record(
            InteractionEvent::new(InteractionType::ScreenView, screen_name, now)
                .with_duration_ms(duration_ms),
        )
    }

    /// Records a product detail view. Counts as a product access.
    pub fn record_product_view(
        &mut self,
        product_id: &str,
        duration_ms: u64,
        now: DateTime<Utc>,
    ) -> Result<InteractionEvent> {
        self.record(
            InteractionEvent::new(InteractionType::ProductView, "product_detail", now)
                .with_product(product_id)
                .with_duration_ms(duration_ms),
        )
    }

    /// Records a search with the query as its action.
    pub fn record_search(&mut self, query: &str, now: DateTime<Utc>) -> Result<InteractionEvent> {
        self.record(InteractionEvent::new(InteractionType::Search, "search", now).with_action(query))
    }

    // == Queries ==
    /// Up to `limit` events, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<InteractionEvent>> {
        let mut events = self.store.get_all()?;
        sort_newest_first(&mut events);
        events.truncate(limit);
        Ok(events)
    }

    /// Up to `limit` events of the given type, newest first.
    pub fn by_type(&self, kind: InteractionType, limit: usize) -> Result<Vec<InteractionEvent>> {
        let mut events = self.store.query(|e| e.kind == kind)?;
        sort_newest_first(&mut events);
        events.truncate(limit);
        Ok(events)
    }

    /// All events referencing `product_id`, newest first.
    pub fn by_product(&self, product_id: &str) -> Result<Vec<InteractionEvent>> {
        let mut events = self
            .store
            .query(|e| e.product_id.as_deref() == Some(product_id))?;
        sort_newest_first(&mut events);
        Ok(events)
    }

    /// Number of events per type. Types without events are absent.
    pub fn counts_by_type(&self) -> Result<BTreeMap<InteractionType, usize>> {
        let mut counts = BTreeMap::new();
        for event in self.store.get_all()? {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Product views and clicks of `product_id` at or after `since`.
    pub fn recent_access_count(&self, product_id: &str, since: DateTime<Utc>) -> Result<u32> {
        let events = self.store.query(|e| {
            e.kind.is_product_access()
                && e.timestamp >= since
                && e.product_id.as_deref() == Some(product_id)
        })?;
        Ok(u32::try_from(events.len()).unwrap_or(u32::MAX))
    }

    /// Product access counts at or after `since`, keyed by product id.
    pub fn access_counts_since(&self, since: DateTime<Utc>) -> Result<BTreeMap<String, u32>> {
        let mut counts = BTreeMap::new();
        let events = self
            .store
            .query(|e| e.kind.is_product_access() && e.timestamp >= since)?;
        for event in events {
            if let Some(product_id) = event.product_id {
                let count: &mut u32 = counts.entry(product_id).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
        Ok(counts)
    }

    /// Number of stored events.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.count()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // == Retention ==
    /// Deletes events strictly older than `cutoff`. Returns how many were
    /// removed.
    pub fn prune_before(&mut self, cutoff: DateTime<Utc>) -> Result<usize> {
        let removed = self.store.delete_where(|e| e.timestamp < cutoff)?;
        if removed > 0 {
            info!("Interaction retention: removed {} events before {}", removed, cutoff);
        }
        Ok(removed)
    }

    /// Deletes events older than `retention_days` relative to `now`.
    pub fn prune_older_than(&mut self, retention_days: i64, now: DateTime<Utc>) -> Result<usize> {
        self.prune_before(window::days_before(now, retention_days)?)
    }
}

fn sort_newest_first(events: &mut [InteractionEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}
