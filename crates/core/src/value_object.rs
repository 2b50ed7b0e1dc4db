//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Two `Sku`s holding
/// the same string are the same SKU; there is no separate identity to track.
///
/// The trait requires `Clone + PartialEq + Debug` so codes can be copied into notices and
/// effects, compared in tests, and logged.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
