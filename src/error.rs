//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("unable to load platform list: {}", _0.display())]
    Platforms(#[error(not(source))] PathBuf),
    #[display("cache error")]
    Cache,
    #[display("library error")]
    Library,
    #[display("queue error")]
    Queue,
    /// `scan` was run without a folder and none is configured.
    #[display("no library folder given and library.default_folder is not set")]
    NoFolder,
    #[display("invalid argument: {_0}")]
    InvalidArgument(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache)
    }
}
