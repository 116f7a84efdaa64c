//! Quicklist Client — keeps a local replica of the quicklist server's owners,
//! quicklists and tickers. It connects to the server socket, subscribes to the
//! broadcast stream, probes liveness every few seconds and applies every
//! inbound event to an SQLite database that the web front end reads.
//!
//! Usage example (CLI):
//! ```bash
//! quicklist_client --endpoint /tmp/quicklist.sock --db ./instance/quicklist.db --bootstrap
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info};
use quicklist_client::ClientConfig;
use quicklist_client::runtime;
use quicklist_common::Result;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let config = ClientConfig {
        endpoint: args.endpoint.parse()?,
        db_path: normalize_path(&args.db),
        host: args.host.trim().to_string(),
        keepalive: Duration::from_secs(args.keepalive_secs.max(1)),
        max_frame_bytes: args.max_frame_bytes,
        grace: Duration::from_secs(args.grace_secs),
        bootstrap: args.bootstrap,
    };

    let (signal_tx, signal_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = signal_tx.try_send(());
    })
    .map_err(|e| quicklist_common::QuicklistError::Format(format!("Ctrl+C handler: {}", e)))?;

    if let Err(e) = runtime::run(&config, signal_rx) {
        error!("Client stopped with error: {}", e);
        return Err(e);
    }
    info!("Client stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
