//! Per-request scratch workspaces
//!
//! A scratch workspace is the pair (archive file, extraction directory)
//! used while one upload is being ingested. Paths derive from the request's
//! own collection key, so concurrent requests with different keys never
//! collide; identical keys are serialized by [`super::locks::KeyLocks`].

use pdg_dsu::CollectionKey;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scratch paths scoped to one ingestion request.
#[derive(Debug)]
pub struct ScratchWorkspace {
    /// Where the uploaded archive bytes are staged.
    pub archive_path: PathBuf,
    /// Where the archive is extracted.
    pub extract_dir: PathBuf,
}

impl ScratchWorkspace {
    /// Derive the workspace paths for a collection key under `root`.
    pub fn for_key(root: &Path, key: &CollectionKey) -> Self {
        let stem = key.join("_");
        Self {
            archive_path: root.join(format!("{stem}.zip")),
            extract_dir: root.join(stem),
        }
    }

    /// Persist the uploaded bytes to the archive path.
    pub async fn stage(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.archive_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.archive_path, bytes).await?;
        debug!(path = %self.archive_path.display(), size = bytes.len(), "staged archive");
        Ok(())
    }

    /// Remove both scratch paths recursively.
    ///
    /// Removal errors are logged, never propagated: cleanup must not mask
    /// the error that triggered it or fail an otherwise successful request.
    /// Called exactly once per request, on every exit path.
    pub async fn cleanup(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.archive_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %self.archive_path.display(),
                    error = %e,
                    "failed to remove scratch archive"
                );
            }
        }

        if let Err(e) = tokio::fs::remove_dir_all(&self.extract_dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %self.extract_dir.display(),
                    error = %e,
                    "failed to remove scratch directory"
                );
            }
        }
    }
}
