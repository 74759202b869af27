//! Platform Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A platform error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for platform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The platform list file could not be read.
    #[display("unable to read platform list: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A line in the platform list is malformed.
    #[display("invalid platform list entry on line {_0}")]
    InvalidEntry(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
