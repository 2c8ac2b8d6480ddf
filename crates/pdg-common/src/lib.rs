//! PDG Common Library
//!
//! Shared utilities for the Product Data Gateway workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all PDG workspace members:
//!
//! - **Logging**: Centralized tracing setup with console/file targets
//! - **Checksums**: SHA-256 digest helpers used for identifier derivation
//!   and content verification

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checksum;
pub mod logging;
