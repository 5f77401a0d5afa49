//! Entry Store Module
//!
//! The keyed store contract the repositories are written against, plus an
//! in-memory implementation used by the daemon and the tests.
//!
//! Stores are plain synchronous values. Callers that share one across tasks
//! wrap it (or the repository owning it) in `Arc<RwLock<_>>`.

mod memory;
mod records;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;
pub use records::ProductRecord;

// == Store Error ==
/// Failure reported by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not complete the operation
    #[error("Store backend failure: {0}")]
    Backend(String),

    /// A row could not be encoded or decoded
    #[error("Record encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Entity Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    PriceHistory,
    Order,
    Preferences,
    Interaction,
}

impl EntityKind {
    /// Collection name of the entity kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::PriceHistory => "price_history",
            EntityKind::Order => "orders",
            EntityKind::Preferences => "user_preferences",
            EntityKind::Interaction => "user_interactions",
        }
    }
}

// == Record Traits ==
/// An entity that can be persisted in an [`EntryStore`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Primary key of the row.
    fn record_id(&self) -> String;
}

/// An append-only entity whose numeric id is assigned by the store.
pub trait SequencedRecord: Record {
    fn with_sequence_id(self, id: u64) -> Self;
}

// == Entry Store ==
/// Keyed storage for one entity kind.
///
/// Every method is atomic with respect to a single row. Nothing here spans
/// more than one call; callers must not assume a lock is held in between.
pub trait EntryStore<T: Record>: Send + Sync {
    fn get_all(&self) -> StoreResult<Vec<T>>;

    fn get_by_id(&self, id: &str) -> StoreResult<Option<T>>;

    fn insert_or_replace(&mut self, record: T) -> StoreResult<()>;

    fn insert_all(&mut self, records: Vec<T>) -> StoreResult<()> {
        for record in records {
            self.insert_or_replace(record)?;
        }
        Ok(())
    }

    /// Read-modify-write of one row. Returns `false` when no row matched.
    ///
    /// `apply` must not change the record id.
    fn update<F>(&mut self, id: &str, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut T);

    /// Deletes the given rows, returning how many existed.
    fn delete_by_ids(&mut self, ids: &[String]) -> StoreResult<usize>;

    /// Deletes each given row only if `predicate` still holds for it at
    /// deletion time.
    fn delete_by_ids_where<F>(&mut self, ids: &[String], predicate: F) -> StoreResult<usize>
    where
        F: Fn(&T) -> bool;

    fn delete_where<F>(&mut self, predicate: F) -> StoreResult<usize>
    where
        F: Fn(&T) -> bool;

    fn query<F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool;

    fn count(&self) -> StoreResult<usize> {
        Ok(self.get_all()?.len())
    }

    /// Removes every row, returning how many were removed.
    fn clear(&mut self) -> StoreResult<usize>;
}

/// Store for append-only entities with auto-incrementing ids.
pub trait AppendStore<T: SequencedRecord>: EntryStore<T> {
    /// Assigns the next id to `record`, stores it and returns the stored row.
    fn append(&mut self, record: T) -> StoreResult<T>;
}
