//! Product collection feature
//!
//! Read side: resolve a code-collection data unit and return its JSON
//! product record. Write side: the archive ingestion pipeline — accept a
//! zip upload, create a fresh data unit for the collection key, and anchor
//! every extracted file as one atomic batch.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::products_routes;
