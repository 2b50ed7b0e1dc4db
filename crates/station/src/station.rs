//! The scanning station: owns the snapshot, the scan buffer and the flow state, and
//! executes the effects the flow asks for.
//!
//! Remote calls and timers run as spawned tasks. Their results come back over a channel
//! and are applied one at a time by [`Station::process_next`], so every state change
//! happens on the caller's task.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use stockscan_core::{SessionId, Sku, TransportError, step};
use stockscan_inventory::{
    FlowEffect, FlowEvent, FlowState, InventoryRecord, InventorySnapshot, Notice,
    ScanAccumulator, ScanInput, UpdateFlow,
};

use crate::config::StationConfig;
use crate::offline::Connectivity;
use crate::remote::{RemoteStore, isolate, with_deadline};
use crate::sink::NoticeSink;

#[derive(Debug)]
enum Completion {
    Refresh {
        seq: u64,
        result: Result<Vec<InventoryRecord>, TransportError>,
    },
    Patch {
        session: SessionId,
        result: Result<(), TransportError>,
    },
    Dismiss {
        session: SessionId,
    },
}

pub struct Station {
    store: Arc<dyn RemoteStore>,
    sink: Arc<dyn NoticeSink>,
    flow: UpdateFlow,
    state: FlowState,
    snapshot: InventorySnapshot,
    scan: ScanAccumulator,
    connectivity: Connectivity,
    request_timeout: Duration,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    dismiss_timer: Option<(SessionId, JoinHandle<()>)>,
    /// Sequence number of the last refresh started.
    refresh_seq: u64,
    /// Sequence number of the refresh the current snapshot came from.
    applied_seq: u64,
}

impl Station {
    pub fn new(
        config: &StationConfig,
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn NoticeSink>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            sink,
            flow: UpdateFlow::new(config.success_display),
            state: FlowState::Idle,
            snapshot: InventorySnapshot::empty(),
            scan: ScanAccumulator::new(),
            connectivity: Connectivity::new(),
            request_timeout: config.request_timeout,
            completions_tx,
            completions_rx,
            in_flight: 0,
            dismiss_timer: None,
            refresh_seq: 0,
            applied_seq: 0,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Keys typed since the last submit.
    pub fn scan_buffer(&self) -> &str {
        self.scan.buffer()
    }

    /// The record the current session points at, as of the current snapshot.
    pub fn matched_record(&self) -> Option<&InventoryRecord> {
        UpdateFlow::matched_record(&self.state, &self.snapshot)
    }

    /// Start a background reload of the whole inventory.
    ///
    /// The current snapshot stays in use until the reload lands, and stays for good if
    /// it fails.
    pub fn refresh(&mut self) {
        self.refresh_seq += 1;
        let seq = self.refresh_seq;
        let store = Arc::clone(&self.store);
        let tx = self.completions_tx.clone();
        let deadline = self.request_timeout;

        tracing::debug!(seq, "refreshing inventory snapshot");
        self.in_flight += 1;
        let call = async move { with_deadline(deadline, store.fetch_all()).await };
        tokio::spawn(async move {
            let result = isolate(call).await;
            let _ = tx.send(Completion::Refresh { seq, result });
        });
    }

    /// Feed one raw input event from the scan surface.
    pub fn input(&mut self, input: ScanInput) {
        if let Some(scan) = self.scan.feed(input) {
            let session = SessionId::new();
            tracing::debug!(raw = %scan.raw, code = %scan.code, %session, "scan submitted");
            self.dispatch(FlowEvent::ScanSubmitted { session, scan });
        }
    }

    /// Type `code` followed by the terminator, the way a wedge scanner does.
    pub fn scan(&mut self, code: &str) {
        for c in code.chars() {
            self.input(ScanInput::Char(c));
        }
        self.input(ScanInput::Submit);
    }

    pub fn open_edit(&mut self) {
        self.dispatch(FlowEvent::OpenEdit);
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.dispatch(FlowEvent::DraftChanged(draft.into()));
    }

    pub fn commit(&mut self) {
        self.dispatch(FlowEvent::CommitRequested);
    }

    pub fn cancel(&mut self) {
        self.dispatch(FlowEvent::Cancel);
    }

    pub fn acknowledge(&mut self) {
        self.dispatch(FlowEvent::Acknowledge);
    }

    /// Drop unsubmitted keys from the scan buffer.
    pub fn clear_scan_buffer(&mut self) {
        self.scan.reset();
    }

    /// Order whatever code is sitting in the scan buffer.
    pub fn order_item(&mut self) {
        let raw = self.scan.buffer().to_string();
        self.dispatch(FlowEvent::OrderRequested { raw });
    }

    /// Whether a remote call or the dismiss timer is still outstanding.
    pub fn has_pending(&self) -> bool {
        self.in_flight > 0 || self.dismiss_timer.is_some()
    }

    /// Wait for the next completion and apply it. Returns `false` when nothing is
    /// outstanding.
    pub async fn process_next(&mut self) -> bool {
        if !self.has_pending() {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.complete(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.process_next().await {}
    }

    fn dispatch(&mut self, event: FlowEvent) {
        let from = self.state.name();
        tracing::trace!(?event, state = from, "flow event");

        let effects = step(&self.flow, &mut self.state, &self.snapshot, event);

        let to = self.state.name();
        if from != to {
            tracing::info!(
                from,
                to,
                session = ?self.state.session(),
                sku = self.state.sku().map(Sku::as_str),
                "flow transition"
            );
        }

        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: FlowEffect) {
        match effect {
            FlowEffect::Notify(notice) => {
                if let Notice::ScanIgnored { raw } = &notice {
                    tracing::warn!(%raw, "scan ignored while a commit is in flight");
                }
                self.sink.notify(&notice);
            }
            FlowEffect::PatchQuantity {
                session,
                sku,
                quantity,
            } => self.spawn_patch(session, sku, quantity),
            FlowEffect::RefreshSnapshot => self.refresh(),
            FlowEffect::StartDismissTimer { session, after } => {
                self.start_dismiss_timer(session, after)
            }
            FlowEffect::CancelDismissTimer { session } => self.cancel_dismiss_timer(session),
            FlowEffect::FocusScanInput => self.sink.focus_scan_input(),
        }
    }

    fn spawn_patch(&mut self, session: SessionId, sku: Sku, quantity: i64) {
        let store = Arc::clone(&self.store);
        let tx = self.completions_tx.clone();
        let deadline = self.request_timeout;

        tracing::info!(%session, %sku, quantity, "sending quantity update");
        self.in_flight += 1;
        let call =
            async move { with_deadline(deadline, store.patch_quantity(&sku, quantity)).await };
        tokio::spawn(async move {
            let result = isolate(call).await;
            let _ = tx.send(Completion::Patch { session, result });
        });
    }

    fn start_dismiss_timer(&mut self, session: SessionId, after: Duration) {
        if let Some((_, previous)) = self.dismiss_timer.take() {
            previous.abort();
        }
        let tx = self.completions_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Completion::Dismiss { session });
        });
        self.dismiss_timer = Some((session, handle));
    }

    fn cancel_dismiss_timer(&mut self, session: SessionId) {
        if self
            .dismiss_timer
            .as_ref()
            .is_some_and(|(armed, _)| *armed == session)
        {
            if let Some((_, handle)) = self.dismiss_timer.take() {
                handle.abort();
            }
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Refresh { seq, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.connectivity.record(&result);
                match result {
                    Ok(records) if seq > self.applied_seq => self.replace_snapshot(seq, records),
                    Ok(_) => tracing::debug!(
                        seq,
                        applied = self.applied_seq,
                        "dropping refresh older than the current snapshot"
                    ),
                    Err(err) => tracing::warn!(
                        error = %err,
                        records = self.snapshot.len(),
                        "inventory refresh failed, keeping previous snapshot"
                    ),
                }
            }
            Completion::Patch { session, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.connectivity.record(&result);
                if let Err(err) = &result {
                    tracing::warn!(%session, error = %err, "quantity update failed");
                }
                self.dispatch(FlowEvent::PatchCompleted { session, result });
            }
            Completion::Dismiss { session } => {
                if self
                    .dismiss_timer
                    .as_ref()
                    .is_some_and(|(armed, _)| *armed == session)
                {
                    self.dismiss_timer = None;
                }
                self.dispatch(FlowEvent::DismissElapsed { session });
            }
        }
    }

    fn replace_snapshot(&mut self, seq: u64, records: Vec<InventoryRecord>) {
        let snapshot = InventorySnapshot::new(records, Utc::now());
        for dup in snapshot.duplicate_keys() {
            tracing::warn!(
                code = %dup.code,
                skus = ?dup.skus,
                "several records share a scan code, the first one wins"
            );
        }
        tracing::info!(seq, records = snapshot.len(), "inventory snapshot replaced");
        self.snapshot = snapshot;
        self.applied_seq = seq;
    }
}

impl Drop for Station {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.dismiss_timer.take() {
            handle.abort();
        }
    }
}
