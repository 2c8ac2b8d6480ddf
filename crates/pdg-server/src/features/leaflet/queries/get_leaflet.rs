use crate::features::FeatureState;
use pdg_dsu::{GtinSsi, StoreError};

/// Lookup of one leaflet document.
#[derive(Debug, Clone)]
pub struct GetLeafletQuery {
    pub gtin: String,
    pub batch: String,
    pub expiration_date: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetLeafletError {
    #[error("leaflet not found in data unit: {0}")]
    NotFound(String),
    #[error("failed to resolve data unit: {0}")]
    Resolution(#[source] StoreError),
}

/// Derive the product identifier, resolve its unit and read the leaflet.
///
/// Resolution failures (unknown identifier, backend trouble) are distinct
/// from a resolved unit that simply lacks the leaflet file.
#[tracing::instrument(skip(state, query), fields(gtin = %query.gtin, batch = %query.batch))]
pub async fn handle(
    state: &FeatureState,
    query: GetLeafletQuery,
) -> Result<Vec<u8>, GetLeafletError> {
    let ssi = GtinSsi::derive(
        &state.dsu.domain,
        &query.gtin,
        &query.batch,
        &query.expiration_date,
    )
    .map_err(GetLeafletError::Resolution)?;

    let unit = state
        .store
        .load(&ssi)
        .await
        .map_err(GetLeafletError::Resolution)?;

    unit.read_file(&state.dsu.leaflet_path)
        .await
        .map_err(|_| GetLeafletError::NotFound(state.dsu.leaflet_path.clone()))
}
