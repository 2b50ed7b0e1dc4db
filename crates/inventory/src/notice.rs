//! Operator-facing notices produced by the update flow.

use serde::{Deserialize, Serialize};

use stockscan_core::{NormalizedCode, ScanError, Sku, TransportError};

/// Something the operator should see.
///
/// Notices flagged [`Notice::is_blocking`] correspond to the alert dialogs of a
/// scanning station: the operator has to acknowledge them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The scanned code matched no record.
    NotFound { code: NormalizedCode },
    /// The scan matched several records; the first one in snapshot order was chosen.
    AmbiguousMatch {
        code: NormalizedCode,
        chosen: Sku,
        shadowed: usize,
    },
    /// Operator input was rejected; nothing was sent.
    ValidationFailed { reason: String },
    /// A scan arrived while a commit was in flight and was dropped.
    ScanIgnored { raw: String },
    CommitSucceeded { sku: Sku, quantity: i64 },
    CommitFailed { sku: Sku, error: TransportError },
    /// The operator asked to order the code in the scan buffer.
    OrderRequested { code: String },
}

impl Notice {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            reason: reason.into(),
        }
    }

    /// The error this notice reports, if it reports one.
    pub fn as_error(&self) -> Option<ScanError> {
        match self {
            Notice::NotFound { code } => Some(ScanError::not_found(code.as_str())),
            Notice::ValidationFailed { reason } => Some(ScanError::validation(reason.clone())),
            Notice::CommitFailed { error, .. } => Some(ScanError::Transport(error.clone())),
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        !matches!(self, Notice::AmbiguousMatch { .. } | Notice::ScanIgnored { .. })
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Notice::NotFound { code } => write!(f, "SKU {code} not found."),
            Notice::AmbiguousMatch {
                code,
                chosen,
                shadowed,
            } => write!(
                f,
                "SKU {code} matches {} records; using {chosen}.",
                shadowed + 1
            ),
            Notice::ValidationFailed { reason } => f.write_str(reason),
            Notice::ScanIgnored { raw } => {
                write!(f, "Scan {raw:?} ignored: an update is still in progress.")
            }
            Notice::CommitSucceeded { sku, quantity } => {
                write!(f, "Inventory updated: {sku} = {quantity}.")
            }
            Notice::CommitFailed { sku, error } => {
                write!(f, "Failed to update inventory for {sku}: {error}")
            }
            Notice::OrderRequested { code } => write!(f, "Order placed for SKU: {code}"),
        }
    }
}
