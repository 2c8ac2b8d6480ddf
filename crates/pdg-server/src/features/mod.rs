//! Feature modules implementing the gateway API
//!
//! Each feature is a vertical slice with its own queries, commands and
//! routes:
//!
//! - **leaflet**: leaflet document lookup by (gtin, batch, expiration date)
//! - **products**: JSON product record lookup by code collection, and the
//!   archive ingestion pipeline that anchors uploaded zips into new data
//!   units
//!
//! Queries are read operations against already anchored units; commands
//! (archive ingestion) create and populate units.

pub mod leaflet;
pub mod products;

use crate::config::DsuConfig;
use crate::ingest::locks::KeyLocks;
use axum::{http::StatusCode, Router};
use pdg_dsu::DsuStore;
use std::sync::Arc;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Data unit store backend.
    pub store: Arc<dyn DsuStore>,
    /// Domain, in-unit paths and scratch directory.
    pub dsu: DsuConfig,
    /// Per-collection-key upload serialization.
    pub locks: KeyLocks,
}

impl FeatureState {
    pub fn new(store: Arc<dyn DsuStore>, dsu: DsuConfig) -> Self {
        Self {
            store,
            dsu,
            locks: KeyLocks::new(),
        }
    }
}

/// Creates the API router with all feature routes mounted
///
/// Routes are top level (`/leaflet`, `/array`); anything else answers 404
/// with an empty body.
pub fn router(state: FeatureState) -> Router {
    Router::new()
        .merge(leaflet::leaflet_routes())
        .merge(products::products_routes())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
