//! HTTP gateway for sheet-backed inventory endpoints.
//!
//! Wire shape (SheetDB-style):
//! - `GET  {base}` → JSON array of rows `{product, sku, quantity, vendor}`
//! - `PATCH {base}/{key_column}/{sku}` with `{"data": {"quantity": "<n>"}}`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::json;

use stockscan_core::{Sku, TransportError};
use stockscan_inventory::InventoryRecord;

use crate::config::{ConfigError, StationConfig};
use crate::remote::RemoteStore;

/// [`RemoteStore`] over HTTP, parameterized by endpoint.
#[derive(Debug, Clone)]
pub struct SheetStoreClient {
    client: Client,
    base: Url,
    token: Option<String>,
    key_column: String,
    timeout_ms: u64,
}

impl SheetStoreClient {
    pub fn new(config: &StationConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base: config.api_url.clone(),
            token: config.auth_token.clone(),
            key_column: config.patch_key_column.clone(),
            timeout_ms: config.request_timeout.as_millis() as u64,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{key_column}/{sku}`, with the SKU encoded as a single path segment.
    pub fn record_url(&self, sku: &Sku) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::network(format!("{} cannot take a path", self.base)))?
            .pop_if_empty()
            .push(&self.key_column)
            .push(sku.as_str());
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout_ms)
        } else if err.is_decode() {
            TransportError::parse(err.to_string())
        } else {
            TransportError::network(err.to_string())
        }
    }

    async fn ensure_success(resp: Response) -> Result<Response, TransportError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TransportError::api(status.as_u16(), body))
    }
}

#[async_trait]
impl RemoteStore for SheetStoreClient {
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>, TransportError> {
        let req = self.authorize(self.client.get(self.base.clone()));
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let resp = Self::ensure_success(resp).await?;

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let records: Vec<InventoryRecord> =
            serde_json::from_slice(&body).map_err(|e| TransportError::parse(e.to_string()))?;

        tracing::debug!(url = %self.base, records = records.len(), "fetched inventory");
        Ok(records)
    }

    async fn patch_quantity(&self, sku: &Sku, quantity: i64) -> Result<(), TransportError> {
        let url = self.record_url(sku)?;
        let body = json!({ "data": { "quantity": quantity.to_string() } });

        let req = self.authorize(self.client.patch(url.clone()).json(&body));
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        Self::ensure_success(resp).await?;

        tracing::debug!(%url, %sku, quantity, "patched quantity");
        Ok(())
    }
}
