//! In-memory reference store
//!
//! Implements the full [`DsuStore`] contract against process memory. Serves
//! as the default backend when no external DSU network is wired in, and as
//! the store used by the test suites. Commit atomicity comes from merging
//! the staged map into the shared unit map under a single write lock.

use crate::error::StoreError;
use crate::ssi::Ssi;
use crate::store::{DataUnit, DsuStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type UnitFiles = HashMap<String, Vec<u8>>;
type Units = Arc<RwLock<HashMap<String, UnitFiles>>>;

/// In-memory data unit store.
///
/// Cloning is cheap and clones share the same unit map.
#[derive(Clone, Default)]
pub struct MemoryDsuStore {
    units: Units,
}

impl MemoryDsuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units currently anchored, for diagnostics.
    pub async fn unit_count(&self) -> usize {
        self.units.read().await.len()
    }
}

#[async_trait]
impl DsuStore for MemoryDsuStore {
    async fn create(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError> {
        let mut units = self.units.write().await;
        if units.contains_key(ssi.as_str()) {
            return Err(StoreError::Collision(ssi.to_string()));
        }
        units.insert(ssi.to_string(), UnitFiles::new());
        debug!(ssi = %ssi, "created data unit");

        Ok(Box::new(MemoryUnit {
            ssi: ssi.clone(),
            units: self.units.clone(),
            staged: None,
        }))
    }

    async fn load(&self, ssi: &Ssi) -> Result<Box<dyn DataUnit>, StoreError> {
        let units = self.units.read().await;
        if !units.contains_key(ssi.as_str()) {
            return Err(StoreError::NotFound(ssi.to_string()));
        }

        Ok(Box::new(MemoryUnit {
            ssi: ssi.clone(),
            units: self.units.clone(),
            staged: None,
        }))
    }
}

/// Handle to one in-memory unit. Staged writes live on the handle and are
/// invisible to readers until committed.
struct MemoryUnit {
    ssi: Ssi,
    units: Units,
    staged: Option<UnitFiles>,
}

#[async_trait]
impl DataUnit for MemoryUnit {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let units = self.units.read().await;
        let files = units
            .get(self.ssi.as_str())
            .ok_or_else(|| StoreError::NotFound(self.ssi.to_string()))?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}:{path}", self.ssi)))
    }

    async fn begin_batch(&mut self) -> Result<(), StoreError> {
        if self.staged.is_some() {
            return Err(StoreError::BatchAlreadyOpen);
        }
        self.staged = Some(UnitFiles::new());
        Ok(())
    }

    async fn write_file(&mut self, path: &str, contents: Vec<u8>) -> Result<(), StoreError> {
        self.staged
            .as_mut()
            .ok_or(StoreError::NoOpenBatch)?
            .insert(path.to_string(), contents);
        Ok(())
    }

    async fn commit_batch(&mut self) -> Result<(), StoreError> {
        let staged = self.staged.take().ok_or(StoreError::NoOpenBatch)?;
        let count = staged.len();

        let mut units = self.units.write().await;
        let files = units
            .get_mut(self.ssi.as_str())
            .ok_or_else(|| StoreError::Backend(format!("unit vanished: {}", self.ssi)))?;
        files.extend(staged);

        debug!(ssi = %self.ssi, files = count, "committed batch");
        Ok(())
    }
}
