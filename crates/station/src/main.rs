//! Terminal scanning station.
//!
//! Every stdin line is a scan. Lines starting with `:` are operator commands.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use stockscan_observability::LogFormat;
use stockscan_station::console::{self, Command, ConsoleSink, HELP};
use stockscan_station::{SheetStoreClient, Station, StationConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StationConfig::from_env().context("reading station configuration")?;
    match config.log_format {
        LogFormat::Json => stockscan_observability::init(),
        LogFormat::Pretty => stockscan_observability::init_pretty(),
    }

    let store = SheetStoreClient::new(&config).context("building inventory client")?;
    tracing::info!(url = %config.api_url, "starting scanning station");

    let mut station = Station::new(&config, Arc::new(store), Arc::new(ConsoleSink::stdout()));
    station.refresh();
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::List => print!("{}", console::render_inventory(&station)),
                    Command::Help => println!("{HELP}"),
                    command => command.apply(&mut station),
                }
                print_state(&station);
            }
            _ = station.process_next(), if station.has_pending() => {
                print_state(&station);
            }
        }
    }

    tracing::info!("station stopped");
    Ok(())
}

fn print_state(station: &Station) {
    if let Some(line) = console::render_state(station) {
        println!("{line}");
    }
}
