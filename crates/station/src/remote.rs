//! Remote inventory store gateway.
//!
//! The scan pipeline consumes exactly two operations from the store: a bulk read and a
//! quantity update keyed by the raw stored SKU. Neither is retried here; callers decide
//! what a failure means (stale snapshot for reads, `Failed` for updates).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use stockscan_core::{Sku, TransportError};
use stockscan_inventory::InventoryRecord;

/// Record-oriented inventory resource keyed by `sku`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read every record, in store order.
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>, TransportError>;

    /// Set the quantity of the record stored under exactly `sku`.
    async fn patch_quantity(&self, sku: &Sku, quantity: i64) -> Result<(), TransportError>;
}

#[async_trait]
impl<T> RemoteStore for Arc<T>
where
    T: RemoteStore + ?Sized,
{
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>, TransportError> {
        (**self).fetch_all().await
    }

    async fn patch_quantity(&self, sku: &Sku, quantity: i64) -> Result<(), TransportError> {
        (**self).patch_quantity(sku, quantity).await
    }
}

/// Run a store call with a deadline; an elapsed deadline becomes [`TransportError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(deadline.as_millis() as u64)),
    }
}

/// Run a store call on its own task. A panic inside the store comes back as
/// [`TransportError::Network`] instead of losing the completion.
pub async fn isolate<T, F>(call: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(result) => result,
        Err(err) => Err(TransportError::network(format!("store call aborted: {err}"))),
    }
}
