use clap::Parser;
use quicklist_client::config::{DEFAULT_DB_PATH, DEFAULT_GRACE_SECS, DEFAULT_HOST};
use quicklist_common::net::{DEFAULT_MAX_FRAME_BYTES, DEFAULT_SOCKET_PATH, KEEPALIVE_SECS};

/// Command-line arguments of the replica client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server endpoint: a socket address for TCP, otherwise a Unix socket path
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    pub endpoint: String,

    /// Path to the replica database
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    pub db: String,

    /// Host name the server liveness status is stored under
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Seconds between STATUS probes
    #[arg(long, default_value_t = KEEPALIVE_SECS)]
    pub keepalive_secs: u64,

    /// Largest inbound frame accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,

    /// Seconds to wait for tasks on shutdown
    #[arg(long, default_value_t = DEFAULT_GRACE_SECS)]
    pub grace_secs: u64,

    /// Fetch owners, quicklists and tickers in bulk right after subscribing
    #[arg(long)]
    pub bootstrap: bool,
}
