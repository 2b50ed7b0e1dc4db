//! Error model for the scan pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure talking to the remote inventory store.
///
/// Every variant is recoverable: the operator re-initiates the flow. Nothing in the
/// pipeline retries on its own.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The store answered with a non-success status.
    #[error("store rejected request ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded into inventory records.
    #[error("parse error: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }
}

/// Operator-facing error.
///
/// All three kinds are surfaced to the operator as notices; none of them is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The scanned code matched no record. Carries the normalized code that was tried.
    #[error("SKU {code} not found")]
    NotFound { code: String },

    /// The operator input was rejected before any network call (e.g. empty quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote store could not be read or updated.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ScanError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
