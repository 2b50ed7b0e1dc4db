//! Line-oriented operator console.
//!
//! Every line is a scan unless it is one of the commands below. Commands that only
//! change what is printed (`list`, `help`, `quit`) are left to the caller.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

use stockscan_inventory::{FlowState, Notice, ScanInput};

use crate::sink::{NoticeSink, TracingSink};
use crate::station::Station;

pub const HELP: &str = "scan a code and press Enter, or: :edit  :qty <n>  :commit  :cancel  :ack  :order <code>  list  quit";

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    List,
    Help,
    Edit,
    Quantity(&'a str),
    Commit,
    Cancel,
    Acknowledge,
    Order(&'a str),
    Scan(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };

        match word {
            "quit" => Command::Quit,
            "list" => Command::List,
            "help" => Command::Help,
            ":edit" => Command::Edit,
            ":qty" => Command::Quantity(arg),
            ":commit" => Command::Commit,
            ":cancel" => Command::Cancel,
            ":ack" => Command::Acknowledge,
            ":order" => Command::Order(arg),
            _ => Command::Scan(line),
        }
    }

    /// Drive `station` with this command. `Quit`, `List` and `Help` do nothing here.
    pub fn apply(self, station: &mut Station) {
        match self {
            Command::Quit | Command::List | Command::Help => {}
            Command::Edit => station.open_edit(),
            Command::Quantity(draft) => station.set_draft(draft),
            Command::Commit => station.commit(),
            Command::Cancel => station.cancel(),
            Command::Acknowledge => station.acknowledge(),
            Command::Order(code) => {
                station.input(ScanInput::Text(code.to_string()));
                station.order_item();
                station.clear_scan_buffer();
            }
            Command::Scan(code) => station.scan(code),
        }
    }
}

/// One status line for the current session, if there is one.
pub fn render_state(station: &Station) -> Option<String> {
    match station.state() {
        FlowState::Idle => None,
        FlowState::Committing { sku, quantity, .. } => {
            Some(format!("   saving {sku} = {quantity}..."))
        }
        state => station.matched_record().map(|record| {
            format!(
                "   [{}] {} | {} | qty {} | {}",
                state.name(),
                record.product,
                record.sku,
                record.quantity,
                record.vendor
            )
        }),
    }
}

/// The current snapshot as a table, with its age and the store's reachability.
pub fn render_inventory(station: &Station) -> String {
    let snapshot = station.snapshot();
    let fetched = snapshot
        .fetched_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    let mut out = format!(
        "{} records, fetched {fetched}, store {:?}\n",
        snapshot.len(),
        station.connectivity().state()
    );
    for record in snapshot.records() {
        let _ = writeln!(
            out,
            "{:<30} {:<16} {:>6}  {}",
            record.product, record.sku, record.quantity, record.vendor
        );
    }
    out
}

/// Prints notices for the operator and forwards them to the log.
pub struct ConsoleSink<W = io::Stdout> {
    out: Mutex<W>,
    log: TracingSink,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            log: TracingSink,
        }
    }

    fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }
}

impl<W: Write + Send> NoticeSink for ConsoleSink<W> {
    fn notify(&self, notice: &Notice) {
        let marker = if notice.is_blocking() { "!!" } else { "  " };
        self.line(&format!("{marker} {notice}"));
        self.log.notify(notice);
    }

    fn focus_scan_input(&self) {
        self.line("scan>");
    }
}
