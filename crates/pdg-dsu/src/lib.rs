//! Data Unit Store client library
//!
//! Abstraction over a decentralized-storage-unit (DSU) backend. A data unit
//! is an opaque, versioned container addressed by an identifier derived from
//! its inputs; it supports file reads and batched transactional writes where
//! a commit (anchor) makes all staged writes durable at once.
//!
//! # Overview
//!
//! - [`CollectionKey`]: ordered, deduplicated set of product codes
//! - [`ArraySsi`] / [`GtinSsi`]: deterministic identifier derivation
//! - [`DsuStore`] / [`DataUnit`]: the store and handle traits
//! - [`MemoryDsuStore`]: in-process reference store implementing the full
//!   batch-commit contract, used in tests and as the default backend
//!
//! # Example
//!
//! ```no_run
//! use pdg_dsu::{ArraySsi, CollectionKey, DsuStore, MemoryDsuStore};
//!
//! # async fn demo() -> Result<(), pdg_dsu::StoreError> {
//! let store = MemoryDsuStore::default();
//! let key = CollectionKey::new(["111".to_string(), "222".to_string()])?;
//! let ssi = ArraySsi::derive("epi", &key, None)?;
//!
//! let mut unit = store.create(&ssi).await?;
//! unit.begin_batch().await?;
//! unit.write_file("/a.txt", b"hello".to_vec()).await?;
//! unit.commit_batch().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod key;
pub mod memory;
pub mod ssi;
pub mod store;

pub use error::StoreError;
pub use key::CollectionKey;
pub use memory::MemoryDsuStore;
pub use ssi::{ArraySsi, GtinSsi, Ssi};
pub use store::{DataUnit, DsuStore};
