//! Archive ingestion pipeline
//!
//! Stages run strictly in sequence per request: create the data unit, write
//! the uploaded archive to scratch storage, extract it, then write every
//! top-level file into one batch and anchor it. A failure at any stage
//! short-circuits; the scratch workspace is swept exactly once on every
//! exit path. The batch is either committed whole or abandoned — a failed
//! request never leaves partially anchored files behind.
//!
//! The one state this pipeline cannot reconcile: a unit created before a
//! later stage fails stays in the store as an empty unit, since creation
//! has no rollback.

use crate::features::FeatureState;
use crate::ingest::extract::{extract_archive, list_files, ExtractError};
use crate::ingest::scratch::ScratchWorkspace;
use axum::body::Bytes;
use pdg_dsu::{ArraySsi, CollectionKey, DataUnit, StoreError};
use tracing::info;

/// One archive upload: the collection key it anchors under and the raw
/// zip bytes, fully accumulated before the pipeline starts.
#[derive(Debug, Clone)]
pub struct IngestArchiveCommand {
    pub key: CollectionKey,
    pub payload: Bytes,
}

/// Stage-tagged pipeline failures. Each variant's message names the stage
/// so operators can tell from the response text alone where the run died.
#[derive(Debug, thiserror::Error)]
pub enum IngestArchiveError {
    #[error("failed to create data unit")]
    Create(#[source] StoreError),

    #[error("failed to write archive to scratch storage")]
    WriteZip(#[source] std::io::Error),

    #[error("failed to extract archive")]
    Extract(#[source] ExtractError),

    #[error("failed to write extracted files into data unit")]
    WriteFiles(#[source] anyhow::Error),

    #[error("failed to anchor batch")]
    Commit(#[source] StoreError),
}

/// Run the pipeline for one upload.
///
/// The caller must already hold the key lock for `command.key`.
#[tracing::instrument(skip_all, fields(key = %command.key))]
pub async fn handle(
    state: &FeatureState,
    command: IngestArchiveCommand,
) -> Result<(), IngestArchiveError> {
    let ssi = ArraySsi::derive(
        &state.dsu.domain,
        &command.key,
        state.dsu.bricks_domain.as_deref(),
    )
    .map_err(IngestArchiveError::Create)?;

    let unit = state
        .store
        .create(&ssi)
        .await
        .map_err(IngestArchiveError::Create)?;

    let scratch = ScratchWorkspace::for_key(&state.dsu.scratch_dir, &command.key);
    let result = run_staged(unit, &scratch, &command.payload).await;

    // Exactly once, success or failure, after the original error is in hand.
    scratch.cleanup().await;

    let file_count = result?;
    info!(ssi = %ssi, files = file_count, "archive ingested");
    Ok(())
}

/// The fallible stages between unit creation and cleanup.
async fn run_staged(
    mut unit: Box<dyn DataUnit>,
    scratch: &ScratchWorkspace,
    payload: &[u8],
) -> Result<usize, IngestArchiveError> {
    scratch
        .stage(payload)
        .await
        .map_err(IngestArchiveError::WriteZip)?;

    extract_archive(&scratch.archive_path, &scratch.extract_dir)
        .map_err(IngestArchiveError::Extract)?;

    let names = list_files(&scratch.extract_dir)
        .await
        .map_err(|e| IngestArchiveError::Extract(ExtractError::Io(e)))?;

    unit.begin_batch()
        .await
        .map_err(|e| IngestArchiveError::WriteFiles(e.into()))?;

    for name in &names {
        let contents = tokio::fs::read(scratch.extract_dir.join(name))
            .await
            .map_err(|e| IngestArchiveError::WriteFiles(e.into()))?;
        unit.write_file(&format!("/{name}"), contents)
            .await
            .map_err(|e| IngestArchiveError::WriteFiles(e.into()))?;
    }

    unit.commit_batch()
        .await
        .map_err(IngestArchiveError::Commit)?;

    Ok(names.len())
}
