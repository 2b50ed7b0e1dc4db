//! Process-wide tracing setup for scan stations.

pub use crate::tracing::LogFormat;

/// Initialize structured (JSON) logging for the process.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize with human-readable output (interactive terminal sessions).
pub fn init_pretty() {
    tracing::init(LogFormat::Pretty);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
