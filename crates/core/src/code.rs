//! Product codes: the raw stored SKU and the normalized matching key.
//!
//! Barcode symbologies disagree on case, separators and padding, so codes are never
//! compared raw. Both sides of a comparison go through [`normalize`] first.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Canonical normalization: keep ASCII `[A-Za-z0-9]`, lower-case the rest away.
///
/// Idempotent. Applied identically to scanned input and to every stored SKU.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A SKU exactly as the remote store holds it.
///
/// The store indexes records by this raw value, so updates are keyed by it rather than by
/// the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> NormalizedCode {
        NormalizedCode::from_raw(&self.0)
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Sku {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl ValueObject for Sku {}

/// A code after normalization. May be empty (e.g. a scan of only punctuation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    pub fn from_raw(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for NormalizedCode {}
