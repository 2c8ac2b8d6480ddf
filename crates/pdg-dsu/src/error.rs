//! Error types for DSU operations

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by identifier derivation and data unit operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage domain is not configured")]
    DomainUnset,

    #[error("collection key is empty")]
    EmptyKey,

    #[error("invalid code in collection key: {0:?}")]
    InvalidCode(String),

    #[error("data unit not found: {0}")]
    NotFound(String),

    #[error("data unit already exists: {0}")]
    Collision(String),

    #[error("no open write batch on this data unit")]
    NoOpenBatch,

    #[error("a write batch is already open on this data unit")]
    BatchAlreadyOpen,

    #[error("backend error: {0}")]
    Backend(String),
}
