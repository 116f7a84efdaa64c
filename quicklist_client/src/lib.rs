//! Quicklist replica client.
//!
//! Keeps a local SQLite replica of the owners, quicklists and tickers held by
//! the quicklist server, over one long-lived newline-framed connection:
//!
//! - `transport` — connection, frame reader and writer.
//! - `tracker` — request numbering and origin-hash correlation.
//! - `sender` — single outbound writer and the keepalive probe.
//! - `processor` — classification and application of inbound frames.
//! - `resync` — gap detection and bulk re-fetch.
//! - `reconcile` — replace-style table synchronization from bulk replies.
//! - `mutation` — incremental changes carried by broadcasts.
//! - `store` — replica store contract and its SQLite implementation.
//! - `intents` — write-intents from the presentation layer.
//! - `runtime` — task wiring and shutdown.
#![warn(missing_docs)]
pub mod config;
pub mod intents;
pub mod mutation;
pub mod processor;
pub mod reconcile;
pub mod resync;
pub mod runtime;
pub mod sender;
pub mod store;
pub mod tracker;
pub mod transport;

pub use config::ClientConfig;
pub use store::{ReplicaStore, SqliteStore};
pub use tracker::RequestTracker;
