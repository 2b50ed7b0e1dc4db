//! `stockscan-core`: primitives shared by the scan pipeline.
//!
//! This crate contains **pure** building blocks (no IO): product codes and their
//! normalization, identifiers, the error taxonomy, and the state machine trait.

pub mod code;
pub mod error;
pub mod id;
pub mod machine;
pub mod value_object;

pub use code::{NormalizedCode, Sku, normalize};
pub use error::{ScanError, TransportError};
pub use id::SessionId;
pub use machine::{StateMachine, Transition, step};
pub use value_object::ValueObject;
