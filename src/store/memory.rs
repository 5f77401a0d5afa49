//! In-memory Entry Store
//!
//! Keeps each row as a JSON document keyed by record id, so every read and
//! write goes through the same encoding a persistent store adapter would use.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde_json::Value;
use tracing::debug;

use super::{AppendStore, EntryStore, Record, SequencedRecord, StoreResult};

// == Memory Store ==
#[derive(Debug)]
pub struct MemoryStore<T> {
    /// Encoded rows by record id
    rows: BTreeMap<String, Value>,
    /// Last id handed out by `append`
    last_sequence: u64,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_sequence: 0,
            _record: PhantomData,
        }
    }
}

impl<T: Record> MemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    pub fn with_records(records: Vec<T>) -> StoreResult<Self> {
        let mut store = Self::new();
        store.insert_all(records)?;
        Ok(store)
    }

    fn decode(value: &Value) -> StoreResult<T> {
        Ok(serde_json::from_value(value.clone())?)
    }

    fn encode(record: &T) -> StoreResult<Value> {
        Ok(serde_json::to_value(record)?)
    }
}

impl<T: Record> EntryStore<T> for MemoryStore<T> {
    fn get_all(&self) -> StoreResult<Vec<T>> {
        self.rows.values().map(Self::decode).collect()
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        self.rows.get(id).map(Self::decode).transpose()
    }

    fn insert_or_replace(&mut self, record: T) -> StoreResult<()> {
        let value = Self::encode(&record)?;
        self.rows.insert(record.record_id(), value);
        Ok(())
    }

    fn update<F>(&mut self, id: &str, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut T),
    {
        let Some(value) = self.rows.get_mut(id) else {
            return Ok(false);
        };

        let mut record = Self::decode(value)?;
        apply(&mut record);
        *value = Self::encode(&record)?;
        Ok(true)
    }

    fn delete_by_ids(&mut self, ids: &[String]) -> StoreResult<usize> {
        let removed = ids.iter().filter(|id| self.rows.remove(*id).is_some()).count();
        debug!("{}: deleted {} of {} rows", T::KIND.as_str(), removed, ids.len());
        Ok(removed)
    }

    fn delete_by_ids_where<F>(&mut self, ids: &[String], predicate: F) -> StoreResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut removed = 0;
        for id in ids {
            let Some(value) = self.rows.get(id) else {
                continue;
            };
            if predicate(&Self::decode(value)?) {
                self.rows.remove(id);
                removed += 1;
            }
        }
        debug!("{}: deleted {} of {} rows", T::KIND.as_str(), removed, ids.len());
        Ok(removed)
    }

    fn delete_where<F>(&mut self, predicate: F) -> StoreResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        let doomed: Vec<String> = self
            .query(predicate)?
            .iter()
            .map(|record| record.record_id())
            .collect();
        self.delete_by_ids(&doomed)
    }

    fn query<F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut matches = Vec::new();
        for value in self.rows.values() {
            let record = Self::decode(value)?;
            if predicate(&record) {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.rows.len())
    }

    fn clear(&mut self) -> StoreResult<usize> {
        let count = self.rows.len();
        self.rows.clear();
        debug!("{}: cleared {} rows", T::KIND.as_str(), count);
        Ok(count)
    }
}

impl<T: SequencedRecord> AppendStore<T> for MemoryStore<T> {
    fn append(&mut self, record: T) -> StoreResult<T> {
        self.last_sequence += 1;
        let record = record.with_sequence_id(self.last_sequence);
        self.insert_or_replace(record.clone())?;
        Ok(record)
    }
}
