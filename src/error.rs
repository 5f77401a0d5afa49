//! Error types for the companion cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::store::StoreError;

// == Companion Error Enum ==
/// Unified error type for repository operations.
#[derive(Error, Debug)]
pub enum CompanionError {
    /// No entity with the given id exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the entity's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller supplied an invalid argument
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reported by the backing store, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Result Type Alias ==
/// Convenience Result type for the companion cache.
pub type Result<T> = std::result::Result<T, CompanionError>;
