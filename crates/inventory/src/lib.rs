//! Scan-resolution and update domain (pure, no IO).
//!
//! Raw input goes through the [`ScanAccumulator`], is resolved against an
//! [`InventorySnapshot`] by the [`matcher`], and drives the [`UpdateFlow`] state machine.
//! Everything here is deterministic; the station crate executes the resulting effects.

pub mod accumulator;
pub mod flow;
pub mod matcher;
pub mod notice;
pub mod record;
pub mod snapshot;

pub use accumulator::{ScanAccumulator, ScanInput, SubmittedScan};
pub use flow::{
    DEFAULT_SUCCESS_DISPLAY, FlowEffect, FlowEvent, FlowState, UpdateFlow, parse_quantity,
};
pub use matcher::{Resolution, match_code, resolve};
pub use notice::Notice;
pub use record::InventoryRecord;
pub use snapshot::{DuplicateKey, InventorySnapshot};
