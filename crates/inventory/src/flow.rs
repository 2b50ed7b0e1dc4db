//! Scan → edit → commit lifecycle.
//!
//! [`UpdateFlow`] is a pure state machine: it receives the current [`FlowState`], the
//! current snapshot and one [`FlowEvent`], and returns the next state plus a list of
//! [`FlowEffect`]s. Network calls and timers are effects; the station driver performs
//! them and feeds their completions back in as events.
//!
//! ```text
//!   Idle ──scan(hit)──► Matched ──open──► Editing ──commit──► Committing
//!    ▲  ◄──scan(miss)─┘   │                  │                 │      │
//!    │                     └──────cancel──────┘              ok│      │err
//!    │                                                         ▼      ▼
//!    └──────────────────dismiss timer / acknowledge─────── Succeeded  Failed
//! ```
//!
//! Only one commit can be in flight: while `Committing`, scans are dropped with a
//! [`Notice::ScanIgnored`] and further commit requests are no-ops.

use std::time::Duration;

use stockscan_core::{SessionId, Sku, StateMachine, Transition, TransportError};

use crate::accumulator::SubmittedScan;
use crate::matcher;
use crate::notice::Notice;
use crate::record::InventoryRecord;
use crate::snapshot::InventorySnapshot;

/// How long the success confirmation stays up before the flow returns to `Idle`.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_millis(1500);

const MISSING_SELECTION: &str = "Please scan a SKU and enter a quantity.";
const MISSING_ORDER_CODE: &str = "Please scan or enter a SKU to order.";

/// Lifecycle state of the active scan session.
///
/// States reference the matched record by its stored SKU only; the record itself is
/// looked up in whatever snapshot is current (see [`UpdateFlow::matched_record`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Matched {
        session: SessionId,
        sku: Sku,
    },
    Editing {
        session: SessionId,
        sku: Sku,
        draft: String,
    },
    Committing {
        session: SessionId,
        sku: Sku,
        quantity: i64,
    },
    Succeeded {
        session: SessionId,
        sku: Sku,
        quantity: i64,
    },
    Failed {
        session: SessionId,
        sku: Sku,
        error: TransportError,
    },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::Matched { .. } => "matched",
            FlowState::Editing { .. } => "editing",
            FlowState::Committing { .. } => "committing",
            FlowState::Succeeded { .. } => "succeeded",
            FlowState::Failed { .. } => "failed",
        }
    }

    pub fn session(&self) -> Option<SessionId> {
        match self {
            FlowState::Idle => None,
            FlowState::Matched { session, .. }
            | FlowState::Editing { session, .. }
            | FlowState::Committing { session, .. }
            | FlowState::Succeeded { session, .. }
            | FlowState::Failed { session, .. } => Some(*session),
        }
    }

    pub fn sku(&self) -> Option<&Sku> {
        match self {
            FlowState::Idle => None,
            FlowState::Matched { sku, .. }
            | FlowState::Editing { sku, .. }
            | FlowState::Committing { sku, .. }
            | FlowState::Succeeded { sku, .. }
            | FlowState::Failed { sku, .. } => Some(sku),
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, FlowState::Committing { .. })
    }
}

/// Inputs to the flow: operator actions and completions of earlier effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A terminator froze the scan buffer. `session` is the id the new session gets if
    /// the scan is accepted.
    ScanSubmitted {
        session: SessionId,
        scan: SubmittedScan,
    },
    OpenEdit,
    /// Replace the quantity draft. Only applies while editing; the editor has to be
    /// opened first.
    DraftChanged(String),
    CommitRequested,
    Cancel,
    /// Operator dismissed the current confirmation or failure.
    Acknowledge,
    /// Order the code currently sitting in the (unsubmitted) scan buffer.
    OrderRequested { raw: String },
    PatchCompleted {
        session: SessionId,
        result: Result<(), TransportError>,
    },
    DismissElapsed { session: SessionId },
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    Notify(Notice),
    /// Persist `quantity` for `sku` (raw stored form). Completes with
    /// [`FlowEvent::PatchCompleted`].
    PatchQuantity {
        session: SessionId,
        sku: Sku,
        quantity: i64,
    },
    /// Re-fetch the whole inventory and replace the snapshot.
    RefreshSnapshot,
    /// Fire [`FlowEvent::DismissElapsed`] after `after`.
    StartDismissTimer { session: SessionId, after: Duration },
    CancelDismissTimer { session: SessionId },
    FocusScanInput,
}

/// The update flow state machine. Holds configuration only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFlow {
    success_display: Duration,
}

impl Default for UpdateFlow {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_DISPLAY)
    }
}

impl UpdateFlow {
    pub fn new(success_display: Duration) -> Self {
        Self { success_display }
    }

    pub fn success_display(&self) -> Duration {
        self.success_display
    }

    /// Resolve the state's weak record reference against `snapshot`.
    ///
    /// `None` when the state holds no session or the record has left the snapshot.
    pub fn matched_record<'a>(
        state: &FlowState,
        snapshot: &'a InventorySnapshot,
    ) -> Option<&'a InventoryRecord> {
        state.sku().and_then(|sku| snapshot.get(sku))
    }

    fn scan(
        &self,
        snapshot: &InventorySnapshot,
        session: SessionId,
        scan: SubmittedScan,
    ) -> Transition<FlowState, FlowEffect> {
        let Some(hit) = matcher::resolve(&scan.code, snapshot) else {
            return Transition::to(FlowState::Idle)
                .effect(FlowEffect::Notify(Notice::NotFound { code: scan.code }));
        };

        let sku = hit.record.sku.clone();
        let mut next = Transition::to(FlowState::Matched {
            session,
            sku: sku.clone(),
        });
        if hit.is_ambiguous() {
            next = next.effect(FlowEffect::Notify(Notice::AmbiguousMatch {
                code: scan.code,
                chosen: sku,
                shadowed: hit.shadowed,
            }));
        }
        next
    }

    fn commit(
        &self,
        state: &FlowState,
        session: SessionId,
        sku: &Sku,
        draft: &str,
    ) -> Transition<FlowState, FlowEffect> {
        match parse_quantity(draft) {
            Ok(quantity) => Transition::to(FlowState::Committing {
                session,
                sku: sku.clone(),
                quantity,
            })
            .effect(FlowEffect::PatchQuantity {
                session,
                sku: sku.clone(),
                quantity,
            }),
            Err(reason) => {
                Transition::to(state.clone()).effect(FlowEffect::Notify(Notice::validation(reason)))
            }
        }
    }
}

/// Validate a quantity draft: non-empty, whole, not negative.
pub fn parse_quantity(draft: &str) -> Result<i64, String> {
    let trimmed = draft.trim();
    if trimmed.is_empty() {
        return Err(MISSING_SELECTION.to_string());
    }
    let quantity: i64 = trimmed
        .parse()
        .map_err(|_| format!("Quantity must be a whole number, got {trimmed:?}."))?;
    if quantity < 0 {
        return Err("Quantity cannot be negative.".to_string());
    }
    Ok(quantity)
}

impl StateMachine for UpdateFlow {
    type State = FlowState;
    type Context = InventorySnapshot;
    type Event = FlowEvent;
    type Effect = FlowEffect;

    fn transition(
        &self,
        state: &FlowState,
        snapshot: &InventorySnapshot,
        event: FlowEvent,
    ) -> Transition<FlowState, FlowEffect> {
        use FlowState as S;

        let stay = || Transition::<FlowState, FlowEffect>::to(state.clone());

        match (state, event) {
            // Single commit in flight.
            (S::Committing { .. }, FlowEvent::ScanSubmitted { scan, .. }) => {
                stay().effect(FlowEffect::Notify(Notice::ScanIgnored { raw: scan.raw }))
            }
            (S::Succeeded { session: shown, .. }, FlowEvent::ScanSubmitted { session, scan }) => {
                let mut next = self.scan(snapshot, session, scan);
                next.effects
                    .insert(0, FlowEffect::CancelDismissTimer { session: *shown });
                next
            }
            (_, FlowEvent::ScanSubmitted { session, scan }) => self.scan(snapshot, session, scan),

            (S::Matched { session, sku }, FlowEvent::OpenEdit) => Transition::to(S::Editing {
                session: *session,
                sku: sku.clone(),
                draft: String::new(),
            }),
            (S::Editing { session, sku, .. }, FlowEvent::DraftChanged(draft)) => {
                Transition::to(S::Editing {
                    session: *session,
                    sku: sku.clone(),
                    draft,
                })
            }

            (S::Editing { session, sku, draft }, FlowEvent::CommitRequested) => {
                self.commit(state, *session, sku, draft)
            }
            (S::Committing { .. }, FlowEvent::CommitRequested) => stay(),
            (_, FlowEvent::CommitRequested) => {
                stay().effect(FlowEffect::Notify(Notice::validation(MISSING_SELECTION)))
            }

            (S::Matched { .. } | S::Editing { .. }, FlowEvent::Cancel) => {
                Transition::to(S::Idle).effect(FlowEffect::FocusScanInput)
            }
            (S::Failed { .. }, FlowEvent::Acknowledge) => {
                Transition::to(S::Idle).effect(FlowEffect::FocusScanInput)
            }
            (S::Succeeded { session, .. }, FlowEvent::Acknowledge) => Transition::with(
                S::Idle,
                vec![
                    FlowEffect::CancelDismissTimer { session: *session },
                    FlowEffect::FocusScanInput,
                ],
            ),

            (_, FlowEvent::OrderRequested { raw }) => {
                let notice = if raw.trim().is_empty() {
                    Notice::validation(MISSING_ORDER_CODE)
                } else {
                    Notice::OrderRequested { code: raw }
                };
                stay().effect(FlowEffect::Notify(notice))
            }

            (
                S::Committing {
                    session: running,
                    sku,
                    quantity,
                },
                FlowEvent::PatchCompleted { session, result },
            ) if *running == session => match result {
                Ok(()) => Transition::with(
                    S::Succeeded {
                        session,
                        sku: sku.clone(),
                        quantity: *quantity,
                    },
                    vec![
                        FlowEffect::Notify(Notice::CommitSucceeded {
                            sku: sku.clone(),
                            quantity: *quantity,
                        }),
                        FlowEffect::RefreshSnapshot,
                        FlowEffect::StartDismissTimer {
                            session,
                            after: self.success_display,
                        },
                    ],
                ),
                Err(error) => Transition::to(S::Failed {
                    session,
                    sku: sku.clone(),
                    error: error.clone(),
                })
                .effect(FlowEffect::Notify(Notice::CommitFailed {
                    sku: sku.clone(),
                    error,
                })),
            },

            (S::Succeeded { session: shown, .. }, FlowEvent::DismissElapsed { session })
                if *shown == session =>
            {
                Transition::to(S::Idle).effect(FlowEffect::FocusScanInput)
            }

            // Stale completions, timers from replaced sessions, actions that do not apply.
            _ => stay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use stockscan_core::{NormalizedCode, step};

    fn snapshot() -> InventorySnapshot {
        InventorySnapshot::new(
            vec![
                InventoryRecord::new("AB-12", "Widget", 5, "Acme"),
                InventoryRecord::new("X1", "Gadget", 1, "Acme"),
                InventoryRecord::new("X2", "Gizmo", 2, "Globex"),
            ],
            Utc::now(),
        )
    }

    fn sid(n: u128) -> SessionId {
        SessionId::from_u128(n)
    }

    fn scan(n: u128, raw: &str) -> FlowEvent {
        FlowEvent::ScanSubmitted {
            session: sid(n),
            scan: SubmittedScan::new(raw),
        }
    }

    fn drive(state: &mut FlowState, snap: &InventorySnapshot, events: Vec<FlowEvent>) -> Vec<FlowEffect> {
        let flow = UpdateFlow::default();
        events
            .into_iter()
            .flat_map(|ev| step(&flow, state, snap, ev))
            .collect()
    }

    fn patches(effects: &[FlowEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, FlowEffect::PatchQuantity { .. }))
            .count()
    }

    fn committing(snap: &InventorySnapshot) -> FlowState {
        let mut state = FlowState::Idle;
        drive(
            &mut state,
            snap,
            vec![
                scan(1, "AB-12"),
                FlowEvent::OpenEdit,
                FlowEvent::DraftChanged("9".into()),
                FlowEvent::CommitRequested,
            ],
        );
        state
    }

    #[test]
    fn matching_scan_moves_to_matched() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(&mut state, &snap, vec![scan(1, "ab12")]);
        assert!(effects.is_empty());
        assert_eq!(
            state,
            FlowState::Matched {
                session: sid(1),
                sku: Sku::new("AB-12")
            }
        );
        assert_eq!(UpdateFlow::matched_record(&state, &snap).unwrap().product, "Widget");
    }

    #[test]
    fn unknown_scan_stays_idle_and_reports_code() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(&mut state, &snap, vec![scan(1, "ZZ-99")]);
        assert_eq!(state, FlowState::Idle);
        assert_eq!(
            effects,
            vec![FlowEffect::Notify(Notice::NotFound {
                code: NormalizedCode::from_raw("zz99")
            })]
        );
    }

    #[test]
    fn empty_scan_is_attempted_and_not_found() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(&mut state, &snap, vec![scan(1, "")]);
        assert_eq!(state, FlowState::Idle);
        assert!(matches!(&effects[..], [FlowEffect::Notify(Notice::NotFound { code })] if code.is_empty()));
    }

    #[test]
    fn open_edit_starts_with_empty_draft() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        drive(&mut state, &snap, vec![scan(1, "X1"), FlowEvent::OpenEdit]);
        assert!(matches!(&state, FlowState::Editing { draft, .. } if draft.is_empty()));
    }

    #[test]
    fn empty_draft_commit_is_rejected_without_patch() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(
            &mut state,
            &snap,
            vec![
                scan(1, "X1"),
                FlowEvent::OpenEdit,
                FlowEvent::DraftChanged("   ".into()),
                FlowEvent::CommitRequested,
            ],
        );
        assert_eq!(patches(&effects), 0);
        assert!(matches!(state, FlowState::Editing { .. }));
        assert_eq!(
            effects,
            vec![FlowEffect::Notify(Notice::validation(MISSING_SELECTION))]
        );
    }

    #[test]
    fn malformed_drafts_are_rejected() {
        assert!(parse_quantity("12a").is_err());
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert_eq!(parse_quantity(" 42 "), Ok(42));
        assert_eq!(parse_quantity("0"), Ok(0));
    }

    #[test]
    fn commit_without_selection_is_a_validation_notice() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(&mut state, &snap, vec![FlowEvent::CommitRequested]);
        assert_eq!(state, FlowState::Idle);
        assert_eq!(
            effects,
            vec![FlowEffect::Notify(Notice::validation(MISSING_SELECTION))]
        );

        drive(&mut state, &snap, vec![scan(1, "X1")]);
        let effects = drive(&mut state, &snap, vec![FlowEvent::CommitRequested]);
        assert_eq!(patches(&effects), 0);
    }

    #[test]
    fn commit_patches_raw_sku() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(
            &mut state,
            &snap,
            vec![
                scan(1, "ab 12"),
                FlowEvent::OpenEdit,
                FlowEvent::DraftChanged("9".into()),
                FlowEvent::CommitRequested,
            ],
        );
        assert_eq!(
            effects,
            vec![FlowEffect::PatchQuantity {
                session: sid(1),
                sku: Sku::new("AB-12"),
                quantity: 9
            }]
        );
        assert!(state.is_committing());
    }

    #[test]
    fn success_refreshes_then_dismisses_to_idle() {
        let snap = snapshot();
        let mut state = committing(&snap);
        let effects = drive(
            &mut state,
            &snap,
            vec![FlowEvent::PatchCompleted {
                session: sid(1),
                result: Ok(()),
            }],
        );
        assert_eq!(state.name(), "succeeded");
        assert_eq!(
            effects,
            vec![
                FlowEffect::Notify(Notice::CommitSucceeded {
                    sku: Sku::new("AB-12"),
                    quantity: 9
                }),
                FlowEffect::RefreshSnapshot,
                FlowEffect::StartDismissTimer {
                    session: sid(1),
                    after: Duration::from_millis(1500)
                },
            ]
        );

        let effects = drive(&mut state, &snap, vec![FlowEvent::DismissElapsed { session: sid(1) }]);
        assert_eq!(state, FlowState::Idle);
        assert_eq!(effects, vec![FlowEffect::FocusScanInput]);
    }

    #[test]
    fn transport_failure_moves_to_failed_without_retry() {
        let snap = snapshot();
        let mut state = committing(&snap);
        let effects = drive(
            &mut state,
            &snap,
            vec![FlowEvent::PatchCompleted {
                session: sid(1),
                result: Err(TransportError::network("connection refused")),
            }],
        );
        assert_eq!(state.name(), "failed");
        assert_eq!(patches(&effects), 0);
        assert!(!effects.contains(&FlowEffect::RefreshSnapshot));
        assert!(matches!(&effects[..], [FlowEffect::Notify(Notice::CommitFailed { .. })]));

        let effects = drive(&mut state, &snap, vec![FlowEvent::Acknowledge]);
        assert_eq!(state, FlowState::Idle);
        assert_eq!(effects, vec![FlowEffect::FocusScanInput]);
    }

    #[test]
    fn failed_accepts_a_new_scan() {
        let snap = snapshot();
        let mut state = committing(&snap);
        drive(
            &mut state,
            &snap,
            vec![
                FlowEvent::PatchCompleted {
                    session: sid(1),
                    result: Err(TransportError::Timeout(10_000)),
                },
                scan(2, "X2"),
            ],
        );
        assert_eq!(state.sku(), Some(&Sku::new("X2")));
        assert_eq!(state.session(), Some(sid(2)));
    }

    #[test]
    fn back_to_back_scans_while_committing_are_ignored() {
        let snap = snapshot();
        let mut state = committing(&snap);
        let before = state.clone();

        let effects = drive(
            &mut state,
            &snap,
            vec![
                scan(2, "X1"),
                scan(3, "X2"),
                FlowEvent::OpenEdit,
                FlowEvent::DraftChanged("1".into()),
                FlowEvent::CommitRequested,
            ],
        );

        assert_eq!(state, before);
        assert_eq!(patches(&effects), 0);
        assert_eq!(
            effects,
            vec![
                FlowEffect::Notify(Notice::ScanIgnored { raw: "X1".into() }),
                FlowEffect::Notify(Notice::ScanIgnored { raw: "X2".into() }),
            ]
        );
    }

    #[test]
    fn scan_during_success_display_cancels_timer() {
        let snap = snapshot();
        let mut state = committing(&snap);
        drive(
            &mut state,
            &snap,
            vec![FlowEvent::PatchCompleted {
                session: sid(1),
                result: Ok(()),
            }],
        );

        let effects = drive(&mut state, &snap, vec![scan(2, "X1")]);
        assert_eq!(effects, vec![FlowEffect::CancelDismissTimer { session: sid(1) }]);
        assert_eq!(state.session(), Some(sid(2)));

        // The old timer firing late must not disturb the new session.
        let effects = drive(&mut state, &snap, vec![FlowEvent::DismissElapsed { session: sid(1) }]);
        assert!(effects.is_empty());
        assert!(matches!(state, FlowState::Matched { .. }));
    }

    #[test]
    fn stale_patch_completion_is_dropped() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        drive(&mut state, &snap, vec![scan(5, "X1")]);
        let before = state.clone();
        let effects = drive(
            &mut state,
            &snap,
            vec![FlowEvent::PatchCompleted {
                session: sid(1),
                result: Ok(()),
            }],
        );
        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn cancel_returns_to_idle_without_network() {
        let snap = snapshot();
        for events in [
            vec![scan(1, "X1"), FlowEvent::Cancel],
            vec![scan(1, "X1"), FlowEvent::OpenEdit, FlowEvent::DraftChanged("4".into()), FlowEvent::Cancel],
        ] {
            let mut state = FlowState::Idle;
            let effects = drive(&mut state, &snap, events);
            assert_eq!(state, FlowState::Idle);
            assert_eq!(effects, vec![FlowEffect::FocusScanInput]);
        }
    }

    #[test]
    fn draft_is_ignored_until_the_editor_is_open() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(
            &mut state,
            &snap,
            vec![
                scan(1, "X1"),
                FlowEvent::DraftChanged("4".into()),
                FlowEvent::CommitRequested,
            ],
        );

        assert_eq!(
            state,
            FlowState::Matched {
                session: sid(1),
                sku: Sku::new("X1")
            }
        );
        assert_eq!(patches(&effects), 0);

        let effects = drive(&mut state, &snap, vec![FlowEvent::OpenEdit]);
        assert!(effects.is_empty());
        assert!(matches!(state, FlowState::Editing { ref draft, .. } if draft.is_empty()));
    }

    #[test]
    fn cancel_does_not_abort_an_in_flight_commit() {
        let snap = snapshot();
        let mut state = committing(&snap);
        let effects = drive(&mut state, &snap, vec![FlowEvent::Cancel]);
        assert!(effects.is_empty());
        assert!(state.is_committing());
    }

    #[test]
    fn ambiguous_match_is_observable() {
        let snap = InventorySnapshot::new(
            vec![
                InventoryRecord::new("x-1", "first", 1, "v"),
                InventoryRecord::new("X1", "second", 2, "v"),
            ],
            Utc::now(),
        );
        let mut state = FlowState::Idle;
        let effects = drive(&mut state, &snap, vec![scan(1, "X1")]);
        assert_eq!(state.sku(), Some(&Sku::new("x-1")));
        assert_eq!(
            effects,
            vec![FlowEffect::Notify(Notice::AmbiguousMatch {
                code: NormalizedCode::from_raw("x1"),
                chosen: Sku::new("x-1"),
                shadowed: 1,
            })]
        );
    }

    #[test]
    fn order_request_uses_raw_buffer() {
        let snap = snapshot();
        let mut state = FlowState::Idle;
        let effects = drive(
            &mut state,
            &snap,
            vec![
                FlowEvent::OrderRequested { raw: "AB-12".into() },
                FlowEvent::OrderRequested { raw: "".into() },
            ],
        );
        assert_eq!(state, FlowState::Idle);
        assert_eq!(
            effects,
            vec![
                FlowEffect::Notify(Notice::OrderRequested { code: "AB-12".into() }),
                FlowEffect::Notify(Notice::validation(MISSING_ORDER_CODE)),
            ]
        );
    }

    fn arb_event() -> impl Strategy<Value = FlowEvent> {
        prop_oneof![
            (1u128..6, prop::sample::select(vec!["X1", "x-2", "AB12", "nope", ""]))
                .prop_map(|(n, raw)| scan(n, raw)),
            Just(FlowEvent::OpenEdit),
            prop::sample::select(vec!["", "3", "x", "-1"])
                .prop_map(|d| FlowEvent::DraftChanged(d.to_string())),
            Just(FlowEvent::CommitRequested),
            Just(FlowEvent::Cancel),
            Just(FlowEvent::Acknowledge),
            (1u128..6, any::<bool>()).prop_map(|(n, ok)| FlowEvent::PatchCompleted {
                session: sid(n),
                result: if ok { Ok(()) } else { Err(TransportError::Timeout(1)) },
            }),
            (1u128..6).prop_map(|n| FlowEvent::DismissElapsed { session: sid(n) }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: a patch is only ever requested from a non-committing state, and a
        /// committing session is never replaced by anything but its own completion.
        #[test]
        fn at_most_one_commit_in_flight(events in prop::collection::vec(arb_event(), 0..40)) {
            let snap = snapshot();
            let flow = UpdateFlow::default();
            let mut state = FlowState::Idle;

            for event in events {
                let before = state.clone();
                let completes_running = matches!(
                    (&before, &event),
                    (FlowState::Committing { session, .. }, FlowEvent::PatchCompleted { session: s, .. })
                        if session == s
                );
                let effects = step(&flow, &mut state, &snap, event);

                if before.is_committing() {
                    prop_assert_eq!(patches(&effects), 0);
                    if !completes_running {
                        prop_assert_eq!(&state, &before);
                    }
                }
                prop_assert!(patches(&effects) <= 1);
            }
        }
    }
}
