//! Error types shared by the replica client crates.
//!
//! The `QuicklistError` enum unifies failure cases for I/O, framing, JSON,
//! the replica store, channel communication and lock poisoning, allowing every
//! component to propagate a single error type.
use std::io;
use std::string::FromUtf8Error;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type of the replica client.
#[derive(Error, Debug)]
pub enum QuicklistError {
    /// I/O error originating from the connection or the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// A frame was not valid UTF-8 text.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// An inbound frame grew past the configured lookahead bound.
    #[error("Frame too large: max {max_frame_bytes} bytes, buffered {got_bytes} without terminator")]
    FrameTooLarge {
        /// Configured bound.
        max_frame_bytes: usize,
        /// Bytes buffered when the bound was hit.
        got_bytes: usize,
    },

    /// The configured endpoint could not be interpreted.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Failure reported by the SQLite replica store.
    #[error("Replica store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Channel send failed (receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuicklistError {
    fn from(err: PoisonError<T>) -> Self {
        QuicklistError::MutexLock(err.to_string())
    }
}
