//! PDG Server Library
//!
//! HTTP gateway exposing product-data lookups backed by a data unit store.
//!
//! # Overview
//!
//! The gateway serves three operations over a small wire surface:
//!
//! - `GET /leaflet` — resolve a product/batch data unit and stream its
//!   leaflet document
//! - `GET /array` — resolve a code-collection data unit and return its JSON
//!   product record
//! - `POST /array` — accept a zip archive upload and anchor its files into a
//!   newly created data unit as one atomic batch
//!
//! Identifier derivation, unit resolution and anchoring are delegated to the
//! `pdg-dsu` collaborator; this crate owns the orchestration: request
//! validation, the upload/extract/batch-commit pipeline, scratch cleanup and
//! error-to-status mapping.
//!
//! # Architecture
//!
//! Feature modules are vertical slices (`features/leaflet`,
//! `features/products`) with their own queries, commands and routes, on top
//! of shared middleware (CORS, request tracing) and an explicit [`config`]
//! struct built once at startup.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework and routing
//! - **Tower-http**: CORS, tracing and compression layers
//! - **Tokio**: async runtime; every file and store operation is an await
//!   point

pub mod config;
pub mod features;
pub mod ingest;
pub mod middleware;
