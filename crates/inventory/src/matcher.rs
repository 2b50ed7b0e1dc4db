//! Resolve a normalized code against a snapshot.
//!
//! Matching is exact on the normalized key (see [`stockscan_core::normalize`]), first
//! record in snapshot order wins. Records whose SKU normalizes to the empty string never
//! match, so a scan of pure punctuation cannot select a blank row.

use stockscan_core::NormalizedCode;

use crate::record::InventoryRecord;
use crate::snapshot::InventorySnapshot;

/// A successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Position of the chosen record in the snapshot.
    pub index: usize,
    pub record: &'a InventoryRecord,
    /// Later records with the same normalized key, skipped in favour of `record`.
    pub shadowed: usize,
}

impl Resolution<'_> {
    pub fn is_ambiguous(&self) -> bool {
        self.shadowed > 0
    }
}

/// Resolve `code`, reporting whether other records share its key.
pub fn resolve<'a>(code: &NormalizedCode, snapshot: &'a InventorySnapshot) -> Option<Resolution<'a>> {
    if code.is_empty() {
        return None;
    }

    let mut hits = snapshot
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.key() == *code);

    let (index, record) = hits.next()?;
    Some(Resolution {
        index,
        record,
        shadowed: hits.count(),
    })
}

/// First record whose normalized SKU equals `code`.
pub fn match_code<'a>(code: &NormalizedCode, snapshot: &'a InventorySnapshot) -> Option<&'a InventoryRecord> {
    resolve(code, snapshot).map(|r| r.record)
}
