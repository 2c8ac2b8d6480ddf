//! Collection keys
//!
//! A collection key is the ordered, deduplicated sequence of product codes
//! identifying one archive/product collection. The key feeds identifier
//! derivation and names scratch paths, so every code must be
//! filesystem-path-safe.

use crate::error::StoreError;

/// Ordered, deduplicated, non-empty sequence of product codes.
///
/// Construction enforces the invariants; a `CollectionKey` in hand is always
/// valid. Duplicate codes are dropped, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    codes: Vec<String>,
}

impl CollectionKey {
    /// Build a key from raw codes, deduplicating while preserving order.
    ///
    /// Fails if the resulting key is empty or any code contains characters
    /// outside `[A-Za-z0-9._-]`.
    pub fn new(codes: impl IntoIterator<Item = String>) -> Result<Self, StoreError> {
        let mut deduped: Vec<String> = Vec::new();

        for code in codes {
            let code = code.trim().to_string();
            if code.is_empty() {
                continue;
            }
            if !is_path_safe(&code) {
                return Err(StoreError::InvalidCode(code));
            }
            if !deduped.contains(&code) {
                deduped.push(code);
            }
        }

        if deduped.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        Ok(Self { codes: deduped })
    }

    /// Parse a comma-separated code list, as received on the wire.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        Self::new(raw.split(',').map(|s| s.to_string()))
    }

    /// The codes in order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Join the codes with a separator. Safe to embed in filesystem paths.
    pub fn join(&self, sep: &str) -> String {
        self.codes.join(sep)
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codes.join(","))
    }
}

fn is_path_safe(code: &str) -> bool {
    // "." and ".." would escape any path the key is embedded in.
    if code == "." || code == ".." {
        return false;
    }
    code.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
