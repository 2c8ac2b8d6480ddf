use crate::features::FeatureState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::queries::get_leaflet::{self, GetLeafletError, GetLeafletQuery};

pub fn leaflet_routes() -> Router<FeatureState> {
    Router::new().route("/leaflet", get(get_leaflet_handler))
}

#[derive(Debug, Deserialize)]
struct LeafletParams {
    gtin: Option<String>,
    batch: Option<String>,
    #[serde(rename = "expirationDate")]
    expiration_date: Option<String>,
}

/// `GET /leaflet?gtin=..&batch=..&expirationDate=..`
///
/// Responds with the raw leaflet document. Status codes carry the contract:
/// 400 if any parameter is missing (nothing downstream is invoked), 404 if
/// the resolved unit has no leaflet, 500 on resolution failure. Bodies are
/// empty in every error case.
async fn get_leaflet_handler(
    State(state): State<FeatureState>,
    Query(params): Query<LeafletParams>,
) -> Response {
    let (Some(gtin), Some(batch), Some(expiration_date)) =
        (params.gtin, params.batch, params.expiration_date)
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let query = GetLeafletQuery {
        gtin,
        batch,
        expiration_date,
    };

    match get_leaflet::handle(&state, query).await {
        Ok(leaflet) => (StatusCode::OK, leaflet).into_response(),
        Err(GetLeafletError::NotFound(path)) => {
            tracing::debug!(path = %path, "leaflet absent in resolved unit");
            StatusCode::NOT_FOUND.into_response()
        },
        Err(e @ GetLeafletError::Resolution(_)) => {
            tracing::error!(error = %e, "leaflet resolution failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}
