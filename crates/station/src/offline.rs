//! Connectivity tracking.
//!
//! The station never blocks on connectivity: a failed refresh just leaves the previous
//! snapshot in use. This only records what the last remote call told us, so a view can
//! flag the snapshot as stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockscan_core::TransportError;

/// Connectivity state of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    /// The last remote call succeeded.
    Online,
    /// The last remote call failed at the transport level.
    Offline,
}

#[derive(Debug, Clone)]
pub struct Connectivity {
    state: ConnectivityState,
    last_error: Option<TransportError>,
    changed_at: DateTime<Utc>,
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity {
    pub fn new() -> Self {
        Self {
            state: ConnectivityState::Online,
            last_error: None,
            changed_at: Utc::now(),
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn is_offline(&self) -> bool {
        self.state == ConnectivityState::Offline
    }

    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    /// When the state last flipped.
    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Record the outcome of a remote call.
    ///
    /// An API rejection (the store answered) still counts as online.
    pub fn record<T>(&mut self, outcome: &Result<T, TransportError>) {
        match outcome {
            Ok(_) | Err(TransportError::Api { .. }) => self.set_online(),
            Err(err) => self.set_offline(err.clone()),
        }
    }

    fn set_online(&mut self) {
        if self.state != ConnectivityState::Online {
            tracing::info!("inventory store reachable again");
            self.changed_at = Utc::now();
        }
        self.state = ConnectivityState::Online;
        self.last_error = None;
    }

    fn set_offline(&mut self, err: TransportError) {
        if self.state != ConnectivityState::Offline {
            tracing::warn!(error = %err, "inventory store unreachable");
            self.changed_at = Utc::now();
        }
        self.state = ConnectivityState::Offline;
        self.last_error = Some(err);
    }
}
