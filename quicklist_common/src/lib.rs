//!
//! Common types and utilities shared by the quicklist replica client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuicklistError` used across the workspace.
//! - `result` — handy `Result<T, QuicklistError>` alias.
//! - `model` — replica rows (owners, quicklists, tickers) and server status.
//! - `request` — outbound request payloads sent to the server.
//! - `event` — inbound events pushed or returned by the server.
//! - `digest` — origin-hash digest used to correlate replies with requests.
//! - `net` — networking constants and endpoint parsing.
#![warn(missing_docs)]
pub mod digest;
pub mod error;
pub mod event;
pub mod model;
pub mod net;
pub mod request;
pub mod result;

pub use error::QuicklistError;
pub use event::Event;
pub use request::Request;
pub use result::Result;
