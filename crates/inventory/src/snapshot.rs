//! In-memory copy of the remote inventory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use stockscan_core::{NormalizedCode, Sku};

use crate::record::InventoryRecord;

/// The full set of records as of the last successful fetch.
///
/// Immutable once built: a refresh replaces the whole snapshot, nothing patches it in
/// place. Record order is the order the store returned them in, which is what makes
/// duplicate resolution deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    records: Vec<InventoryRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Normalized key shared by more than one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub code: NormalizedCode,
    /// Raw SKUs in snapshot order; the first one wins on lookup.
    pub skus: Vec<Sku>,
}

impl InventorySnapshot {
    /// Empty snapshot (startup state, before the first fetch lands).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(records: Vec<InventoryRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When this snapshot was fetched; `None` until the first successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Exact lookup by stored SKU (resolves a session's weak reference).
    pub fn get(&self, sku: &Sku) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| &r.sku == sku)
    }

    /// Normalized keys that more than one record maps to.
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey> {
        let mut order: Vec<NormalizedCode> = Vec::new();
        let mut groups: HashMap<NormalizedCode, Vec<Sku>> = HashMap::new();

        for record in &self.records {
            let key = record.key();
            if key.is_empty() {
                continue;
            }
            let skus = groups.entry(key.clone()).or_default();
            if skus.is_empty() {
                order.push(key);
            }
            skus.push(record.sku.clone());
        }

        order
            .into_iter()
            .filter_map(|code| {
                let skus = groups.remove(&code)?;
                (skus.len() > 1).then_some(DuplicateKey { code, skus })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(skus: &[&str]) -> InventorySnapshot {
        let records = skus
            .iter()
            .map(|s| InventoryRecord::new(*s, format!("product {s}"), 1, "vendor"))
            .collect();
        InventorySnapshot::new(records, Utc::now())
    }

    #[test]
    fn empty_snapshot_has_no_fetch_time() {
        let snap = InventorySnapshot::empty();
        assert!(snap.is_empty());
        assert!(snap.fetched_at().is_none());
    }

    #[test]
    fn get_is_exact_on_raw_sku() {
        let snap = snapshot(&["AB-12", "CD-34"]);
        assert_eq!(snap.get(&Sku::new("CD-34")).unwrap().product, "product CD-34");
        assert!(snap.get(&Sku::new("cd34")).is_none());
    }

    #[test]
    fn duplicate_keys_are_reported_in_snapshot_order() {
        let snap = snapshot(&["ab-12", "X1", "AB12", "x-1", "ZZ", "Ab 12"]);
        let dups = snap.duplicate_keys();
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].code.as_str(), "ab12");
        assert_eq!(
            dups[0].skus,
            vec![Sku::new("ab-12"), Sku::new("AB12"), Sku::new("Ab 12")]
        );
        assert_eq!(dups[1].code.as_str(), "x1");
    }

    #[test]
    fn blank_skus_are_not_duplicates() {
        let snap = snapshot(&["", "--", "A1"]);
        assert!(snap.duplicate_keys().is_empty());
    }
}
