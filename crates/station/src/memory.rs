//! In-memory [`RemoteStore`] for tests and offline demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use stockscan_core::{Sku, TransportError};
use stockscan_inventory::InventoryRecord;

use crate::remote::RemoteStore;

/// A store backed by a `Vec`, with call counters and failure injection.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<InventoryRecord>>,
    fetch_calls: AtomicUsize,
    patch_calls: AtomicUsize,
    fetch_failure: Mutex<Option<TransportError>>,
    patch_failure: Mutex<Option<TransportError>>,
    patch_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl InMemoryStore {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<InventoryRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn quantity_of(&self, sku: &str) -> Option<i64> {
        self.records()
            .into_iter()
            .find(|r| r.sku.as_str() == sku)
            .map(|r| r.quantity)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn patch_calls(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }

    /// Make every fetch fail with `err` until cleared with `None`.
    pub fn fail_fetches(&self, err: Option<TransportError>) {
        if let Ok(mut slot) = self.fetch_failure.lock() {
            *slot = err;
        }
    }

    /// Make every patch fail with `err` until cleared with `None`.
    pub fn fail_patches(&self, err: Option<TransportError>) {
        if let Ok(mut slot) = self.patch_failure.lock() {
            *slot = err;
        }
    }

    /// Park patches until [`InMemoryStore::release_patch`] lets them through one by one.
    pub fn hold_patches(&self) {
        if let Ok(mut gate) = self.patch_gate.lock() {
            *gate = Some(Arc::new(Semaphore::new(0)));
        }
    }

    pub fn release_patch(&self) {
        if let Ok(gate) = self.patch_gate.lock() {
            if let Some(gate) = gate.as_ref() {
                gate.add_permits(1);
            }
        }
    }

    fn injected(slot: &Mutex<Option<TransportError>>) -> Option<TransportError> {
        slot.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>, TransportError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = Self::injected(&self.fetch_failure) {
            return Err(err);
        }
        Ok(self.records())
    }

    async fn patch_quantity(&self, sku: &Sku, quantity: i64) -> Result<(), TransportError> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.patch_gate.lock().ok().and_then(|g| g.clone());
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| TransportError::network(e.to_string()))?;
            permit.forget();
        }

        if let Some(err) = Self::injected(&self.patch_failure) {
            return Err(err);
        }

        let mut records = self
            .records
            .lock()
            .map_err(|e| TransportError::network(e.to_string()))?;
        match records.iter_mut().find(|r| &r.sku == sku) {
            Some(record) => {
                record.quantity = quantity;
                Ok(())
            }
            None => Err(TransportError::api(404, format!("no record with sku {sku}"))),
        }
    }
}
