use crate::features::FeatureState;
use pdg_dsu::{ArraySsi, CollectionKey, StoreError};

/// Lookup of the JSON product record for a code collection.
#[derive(Debug, Clone)]
pub struct ReadProductsQuery {
    pub key: CollectionKey,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadProductsError {
    #[error("failed to resolve data unit: {0}")]
    Resolution(#[source] StoreError),
    #[error("unable to parse product record")]
    Parse(#[source] serde_json::Error),
}

/// Derive the collection identifier, resolve its unit and parse the product
/// record stored at the configured data path.
#[tracing::instrument(skip(state, query), fields(key = %query.key))]
pub async fn handle(
    state: &FeatureState,
    query: ReadProductsQuery,
) -> Result<serde_json::Value, ReadProductsError> {
    let ssi = ArraySsi::derive(
        &state.dsu.domain,
        &query.key,
        state.dsu.bricks_domain.as_deref(),
    )
    .map_err(ReadProductsError::Resolution)?;

    let unit = state
        .store
        .load(&ssi)
        .await
        .map_err(ReadProductsError::Resolution)?;

    let data = unit
        .read_file(&state.dsu.data_path)
        .await
        .map_err(ReadProductsError::Resolution)?;

    serde_json::from_slice(&data).map_err(ReadProductsError::Parse)
}
