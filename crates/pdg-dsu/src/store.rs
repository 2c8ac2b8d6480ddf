//! Store and data unit traits
//!
//! The seam between the gateway and whatever backend anchors data units.
//! Implementations must uphold the batch contract: writes staged between
//! `begin_batch` and `commit_batch` become visible atomically on commit,
//! and an abandoned batch leaves previously committed content untouched.

use crate::error::StoreError;
use crate::ssi::Ssi;
use async_trait::async_trait;

/// A writable, batch-capable handle to one data unit.
///
/// At most one batch may be open on a handle at a time.
#[async_trait]
pub trait DataUnit: Send + Sync {
    /// Read a committed file from the unit.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Open a write batch on this handle.
    async fn begin_batch(&mut self) -> Result<(), StoreError>;

    /// Stage one file write inside the open batch.
    async fn write_file(&mut self, path: &str, contents: Vec<u8>) -> Result<(), StoreError>;

    /// Anchor all staged writes. On success every staged file is durably
    /// visible; on failure nothing staged in this batch is committed.
    async fn commit_batch(&mut self) -> Result<(), StoreError>;
}

/// Factory/resolver for data units.
#[async_trait]
pub trait DsuStore: Send + Sync {
    /// Materialize a new, empty, writable data unit for the identifier.
    ///
    /// Fails with [`StoreError::Collision`] if a unit already exists there.
    /// Once created the unit stays in place even if it is never committed
    /// to; there is no automatic rollback of creation.
    async fn create(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError>;

    /// Resolve an existing data unit.
    async fn load(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError>;
}
