//! Runtime settings of the replica client.
use std::path::PathBuf;
use std::time::Duration;

use quicklist_common::net::{
    DEFAULT_MAX_FRAME_BYTES, DEFAULT_SOCKET_PATH, Endpoint, KEEPALIVE_SECS,
};

/// Key of the liveness row in the replica.
pub const DEFAULT_HOST: &str = "api.quicklist.tech";
/// Replica database file used when none is configured.
pub const DEFAULT_DB_PATH: &str = "quicklist.db";
/// How long shutdown waits for the tasks to finish.
pub const DEFAULT_GRACE_SECS: u64 = 5;

/// Everything the client needs to connect and replicate.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server endpoint.
    pub endpoint: Endpoint,
    /// Replica database file.
    pub db_path: PathBuf,
    /// Host name the liveness status is recorded under.
    pub host: String,
    /// Period of the `STATUS` probe.
    pub keepalive: Duration,
    /// Bound on a single inbound frame.
    pub max_frame_bytes: usize,
    /// Shutdown grace period.
    pub grace: Duration,
    /// Request a full refresh right after subscribing.
    pub bootstrap: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Unix(PathBuf::from(DEFAULT_SOCKET_PATH)),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            host: DEFAULT_HOST.to_string(),
            keepalive: Duration::from_secs(KEEPALIVE_SECS),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            grace: Duration::from_secs(DEFAULT_GRACE_SECS),
            bootstrap: false,
        }
    }
}
