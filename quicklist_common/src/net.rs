//! Shared networking constants and endpoint parsing.
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::QuicklistError;

/// Unix-domain socket the quicklist server listens on by default.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/quicklist.sock";
/// Frame terminator, in both directions.
pub const FRAME_TERMINATOR: u8 = b'\n';
/// Upper bound on bytes buffered while looking for a terminator.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 20_000_000;
/// Liveness probe period in seconds.
pub const KEEPALIVE_SECS: u64 = 10;
/// Untracked liveness probe sent by the keepalive task.
pub const STATUS_PROBE: &str = "STATUS";

/// Where the server can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP socket address such as `127.0.0.1:7000`.
    Tcp(SocketAddr),
    /// Filesystem path of a Unix-domain stream socket.
    Unix(PathBuf),
}

impl FromStr for Endpoint {
    type Err = QuicklistError;

    /// Anything that parses as a socket address is TCP; any other non-empty
    /// value is a Unix socket path. A `unix:` or `tcp:` prefix forces the kind.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(path) = trimmed.strip_prefix("unix:") {
            if path.is_empty() {
                return Err(QuicklistError::InvalidEndpoint(raw.to_string()));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }
        if let Some(addr) = trimmed.strip_prefix("tcp:") {
            return addr
                .parse()
                .map(Endpoint::Tcp)
                .map_err(|e| QuicklistError::InvalidEndpoint(format!("{}: {}", raw, e)));
        }
        if trimmed.is_empty() {
            return Err(QuicklistError::InvalidEndpoint(raw.to_string()));
        }
        match trimmed.parse::<SocketAddr>() {
            Ok(addr) => Ok(Endpoint::Tcp(addr)),
            Err(_) => Ok(Endpoint::Unix(PathBuf::from(trimmed))),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp:{}", addr),
            Endpoint::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

#[cfg(test)]
#[path = "net_tests.rs"]
mod tests;
