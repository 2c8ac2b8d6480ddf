pub mod ingest_archive;

pub use ingest_archive::{IngestArchiveCommand, IngestArchiveError};
