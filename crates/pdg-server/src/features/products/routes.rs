use crate::features::FeatureState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pdg_dsu::CollectionKey;
use serde::Deserialize;

use super::{
    commands::ingest_archive::{self, IngestArchiveCommand, IngestArchiveError},
    queries::read_products::{self, ReadProductsError, ReadProductsQuery},
};

pub fn products_routes() -> Router<FeatureState> {
    Router::new().route(
        "/array",
        get(read_products_handler).post(ingest_archive_handler),
    )
}

#[derive(Debug, Deserialize)]
struct ArrayParams {
    arr: Option<String>,
}

/// `GET /array?arr=<JSON array string>`
///
/// Responds with the JSON product record of the collection's data unit.
async fn read_products_handler(
    State(state): State<FeatureState>,
    Query(params): Query<ArrayParams>,
) -> Result<Response, ProductApiError> {
    let Some(arr) = params.arr else {
        return Err(ProductApiError::MissingParam);
    };

    let codes: Vec<String> =
        serde_json::from_str(&arr).map_err(|_| ProductApiError::BadFormat)?;
    if codes.is_empty() {
        return Err(ProductApiError::BadFormat);
    }
    let key = CollectionKey::new(codes).map_err(|_| ProductApiError::BadFormat)?;

    let record = read_products::handle(&state, ReadProductsQuery { key: key.clone() })
        .await
        .map_err(|e| {
            tracing::error!(key = %key, error = %e, "product record lookup failed");
            ProductApiError::Read(e)
        })?;

    Ok((StatusCode::OK, Json(record)).into_response())
}

/// `POST /array?arr=<comma-separated codes>` with a binary zip body
///
/// Runs the archive ingestion pipeline under the key lock and answers
/// `"OK"` on full success, or a stage-specific message on failure.
async fn ingest_archive_handler(
    State(state): State<FeatureState>,
    Query(params): Query<ArrayParams>,
    body: Bytes,
) -> Result<Response, ProductApiError> {
    let Some(arr) = params.arr else {
        return Err(ProductApiError::MissingParam);
    };
    let key = CollectionKey::parse(&arr).map_err(|_| ProductApiError::BadFormat)?;

    // Identical keys share scratch paths; hold the key lock across the run.
    let _guard = state.locks.acquire(&key.join("_")).await;

    ingest_archive::handle(
        &state,
        IngestArchiveCommand {
            key: key.clone(),
            payload: body,
        },
    )
    .await
    .map_err(|e| {
        tracing::error!(key = %key, error = %e, "archive ingestion failed");
        ProductApiError::Ingest(e)
    })?;

    Ok((StatusCode::OK, "OK").into_response())
}

#[derive(Debug)]
enum ProductApiError {
    MissingParam,
    BadFormat,
    Read(ReadProductsError),
    Ingest(IngestArchiveError),
}

impl IntoResponse for ProductApiError {
    fn into_response(self) -> Response {
        match self {
            ProductApiError::MissingParam => {
                (StatusCode::BAD_REQUEST, "Missing arr param.").into_response()
            },
            ProductApiError::BadFormat => {
                (StatusCode::BAD_REQUEST, "Wrong format of arr").into_response()
            },
            ProductApiError::Read(ReadProductsError::Parse(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unable to parse Product",
            )
                .into_response(),
            ProductApiError::Read(ReadProductsError::Resolution(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error reading DSU").into_response()
            },
            ProductApiError::Ingest(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            },
        }
    }
}
