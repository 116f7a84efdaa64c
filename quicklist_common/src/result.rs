//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `QuicklistError`, so functions can simply return `Result<T>`.
use crate::error::QuicklistError;

/// Workspace-wide `Result` alias with `QuicklistError` as the default error.
pub type Result<T, E = QuicklistError> = std::result::Result<T, E>;
