//! Leaflet lookup feature
//!
//! Resolves the data unit for a (gtin, batch, expiration date) triple and
//! streams out its leaflet document.

pub mod queries;
pub mod routes;

pub use routes::leaflet_routes;
