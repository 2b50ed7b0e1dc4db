use serde::{Deserialize, Deserializer, Serialize};

use stockscan_core::{NormalizedCode, Sku};

/// One inventory row as held by the remote store.
///
/// Sheet-backed stores hand every cell back as a string, so `sku` and `quantity` accept
/// either JSON strings or numbers. Missing display columns default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(deserialize_with = "wire::sku", default = "wire::empty_sku")]
    pub sku: Sku,
    #[serde(default)]
    pub product: String,
    #[serde(deserialize_with = "wire::quantity", default)]
    pub quantity: i64,
    #[serde(default)]
    pub vendor: String,
}

impl InventoryRecord {
    pub fn new(
        sku: impl Into<Sku>,
        product: impl Into<String>,
        quantity: i64,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            product: product.into(),
            quantity,
            vendor: vendor.into(),
        }
    }

    /// Matching key of this record.
    pub fn key(&self) -> NormalizedCode {
        self.sku.normalized()
    }
}

mod wire {
    use serde_json::value::RawValue;

    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub(super) fn empty_sku() -> Sku {
        Sku::new("")
    }

    /// Strings are taken as is. Numbers keep their literal text (`12.50` stays `12.50`,
    /// big integers are not rounded). Updates are keyed by this text.
    pub(super) fn sku<'de, D>(deserializer: D) -> Result<Sku, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<Box<RawValue>>::deserialize(deserializer)? else {
            return Ok(empty_sku());
        };
        let text = raw.get().trim();
        if text.starts_with('"') {
            let s: String = serde_json::from_str(text).map_err(serde::de::Error::custom)?;
            return Ok(Sku::new(s));
        }
        match text.as_bytes().first() {
            Some(b'-' | b'0'..=b'9') => Ok(Sku::new(text)),
            _ => Err(serde::de::Error::custom(format!(
                "sku must be a string or a number, got {text}"
            ))),
        }
    }

    /// Blank cells read as zero; anything else must be an integer.
    pub(super) fn quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Cell>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Cell::Int(n)) => Ok(n),
            Some(Cell::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            Some(Cell::Float(f)) => Err(serde::de::Error::custom(format!(
                "quantity is not an integer: {f}"
            ))),
            Some(Cell::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed.parse::<i64>().map_err(|_| {
                    serde::de::Error::custom(format!("quantity is not an integer: {s:?}"))
                })
            }
        }
    }
}
