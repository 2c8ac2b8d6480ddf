//! Identifier derivation
//!
//! Identifiers are pure functions of their inputs: the same domain, codes
//! and optional bricks-domain hint always produce the same identifier
//! string. Derivation never talks to the backend.

use crate::error::StoreError;
use crate::key::CollectionKey;
use pdg_common::checksum::sha256_hex;

/// Key derivation scheme version tag.
const KEY_VERSION: &str = "v0";

/// A derived, content-addressed storage identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ssi(String);

impl Ssi {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ssi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives identifiers for code-collection data units.
pub struct ArraySsi;

impl ArraySsi {
    /// Derive the identifier for a collection key in a domain.
    ///
    /// `bricks_domain` is the optional secondary-domain hint; when present
    /// it is folded in as `domain.bricks_domain`, so units anchored with a
    /// hint resolve to a different identifier than units without one.
    pub fn derive(
        domain: &str,
        key: &CollectionKey,
        bricks_domain: Option<&str>,
    ) -> Result<Ssi, StoreError> {
        if domain.trim().is_empty() {
            return Err(StoreError::DomainUnset);
        }

        let hint = bricks_domain.map(|b| format!("{domain}.{b}"));
        let material = format!(
            "{domain}\x1f{KEY_VERSION}\x1f{}\x1f{}",
            key.join("\x1e"),
            hint.as_deref().unwrap_or("")
        );
        let digest = sha256_hex(material.as_bytes());

        Ok(Ssi(format!("ssi:array:{domain}:{digest}:{KEY_VERSION}")))
    }
}

/// Derives identifiers for product/batch data units keyed by GTIN.
pub struct GtinSsi;

impl GtinSsi {
    /// Derive the identifier for a (gtin, batch, expiration date) triple.
    pub fn derive(
        domain: &str,
        gtin: &str,
        batch: &str,
        expiration_date: &str,
    ) -> Result<Ssi, StoreError> {
        if domain.trim().is_empty() {
            return Err(StoreError::DomainUnset);
        }

        let material = format!("{domain}\x1f{KEY_VERSION}\x1f{gtin}\x1f{batch}\x1f{expiration_date}");
        let digest = sha256_hex(material.as_bytes());

        Ok(Ssi(format!("ssi:gtin:{domain}:{digest}:{KEY_VERSION}")))
    }
}
