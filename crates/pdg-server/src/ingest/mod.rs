//! Archive ingestion pipeline support
//!
//! Building blocks for the upload/extract/batch-commit pipeline behind
//! `POST /array`:
//!
//! - [`scratch`]: per-request scratch workspaces with unconditional cleanup
//! - [`extract`]: zip extraction with a path-traversal guard, plus the flat
//!   file listing the batch writer consumes
//! - [`locks`]: per-collection-key mutual exclusion so concurrent uploads
//!   with identical keys cannot race on the same scratch paths

pub mod extract;
pub mod locks;
pub mod scratch;
