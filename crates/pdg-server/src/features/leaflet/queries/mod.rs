pub mod get_leaflet;

pub use get_leaflet::{GetLeafletError, GetLeafletQuery};
