//! Where notices go.

use std::sync::Mutex;

use stockscan_inventory::Notice;

/// Presentation side of the station: shows notices and owns the scan input focus.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: &Notice);

    /// Put the cursor back into the scan input.
    fn focus_scan_input(&self) {}
}

/// Sink that only logs. Used when no operator surface is attached.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn notify(&self, notice: &Notice) {
        tracing::info!(notice = %notice, blocking = notice.is_blocking(), "operator notice");
    }
}

/// Sink that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
    focus_requests: Mutex<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests.lock().map(|n| *n).unwrap_or_default()
    }
}

impl NoticeSink for RecordingSink {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }

    fn focus_scan_input(&self) {
        if let Ok(mut n) = self.focus_requests.lock() {
            *n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use stockscan_core::NormalizedCode;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tracing_sink_logs_the_notice_text() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.notify(&Notice::NotFound {
                code: NormalizedCode::from_raw("ZZ-99"),
            });
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("operator notice"), "{output}");
        assert!(output.contains("SKU zz99 not found."), "{output}");
        assert!(output.contains("blocking=true"), "{output}");
    }

    #[test]
    fn recording_sink_keeps_order_and_counts_focus() {
        let sink = RecordingSink::new();
        sink.notify(&Notice::validation("first"));
        sink.notify(&Notice::validation("second"));
        sink.focus_scan_input();

        assert_eq!(
            sink.notices(),
            vec![Notice::validation("first"), Notice::validation("second")]
        );
        assert_eq!(sink.focus_requests(), 1);
    }
}
