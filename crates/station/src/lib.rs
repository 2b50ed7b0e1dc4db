//! Scanning station runtime: remote store gateway, configuration and the driver that
//! runs the update flow against real I/O.

pub mod config;
pub mod console;
pub mod memory;
pub mod offline;
pub mod remote;
pub mod sheet;
pub mod sink;
pub mod station;

pub use config::{ConfigError, StationConfig};
pub use console::{Command, ConsoleSink};
pub use memory::InMemoryStore;
pub use offline::{Connectivity, ConnectivityState};
pub use remote::{RemoteStore, isolate, with_deadline};
pub use sheet::SheetStoreClient;
pub use sink::{NoticeSink, RecordingSink, TracingSink};
pub use station::Station;
