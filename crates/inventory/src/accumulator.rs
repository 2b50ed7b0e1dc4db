//! Assemble keyed/scanned input into submitted codes.
//!
//! A wedge scanner types the code one key at a time and finishes with Enter. The
//! accumulator buffers keys until that terminator, then hands the buffer off and is empty
//! again before the caller sees the result. A fast second scan therefore always starts
//! from a clean buffer, whatever the caller does with the first one.

use serde::{Deserialize, Serialize};

use stockscan_core::NormalizedCode;

/// One raw input event from the scan surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanInput {
    /// A single key. `'\r'` and `'\n'` act as the terminator.
    Char(char),
    /// Pasted text, appended verbatim.
    Text(String),
    /// Delete the last character.
    Backspace,
    /// Explicit submit (Enter key or equivalent).
    Submit,
}

/// A frozen buffer, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedScan {
    pub raw: String,
    pub code: NormalizedCode,
}

impl SubmittedScan {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let code = NormalizedCode::from_raw(&raw);
        Self { raw, code }
    }
}

/// Per-session input buffer.
///
/// Submit policy: a terminator is a no-op only when nothing was typed since the last
/// submit. Once any key or paste landed, the submit emits even if backspaces emptied the
/// buffer again; the empty code then fails matching like any other unknown code.
#[derive(Debug, Clone, Default)]
pub struct ScanAccumulator {
    buffer: String,
    touched: bool,
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (not yet submitted) buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Feed one event; returns a scan when the event was a terminator.
    pub fn feed(&mut self, input: ScanInput) -> Option<SubmittedScan> {
        match input {
            ScanInput::Char('\r' | '\n') | ScanInput::Submit => self.submit(),
            ScanInput::Char(c) => {
                self.buffer.push(c);
                self.touched = true;
                None
            }
            ScanInput::Text(text) => {
                self.buffer.push_str(&text);
                self.touched = true;
                None
            }
            ScanInput::Backspace => {
                self.buffer.pop();
                self.touched = true;
                None
            }
        }
    }

    /// Feed a string key by key; line terminators inside it submit.
    pub fn feed_keys(&mut self, keys: &str) -> Vec<SubmittedScan> {
        keys.chars()
            .filter_map(|c| self.feed(ScanInput::Char(c)))
            .collect()
    }

    /// Drop the buffer without submitting.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.touched = false;
    }

    fn submit(&mut self) -> Option<SubmittedScan> {
        if !self.touched {
            return None;
        }
        let raw = std::mem::take(&mut self.buffer);
        self.touched = false;
        Some(SubmittedScan::new(raw))
    }
}
