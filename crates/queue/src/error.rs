//! Queue Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Errors only surface at the edges of a run: starting it, locating tools,
//! reading queue files. Once the worker is draining the queue, every problem
//! becomes a status line and an [`Outcome`](crate::Outcome) instead.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A queue error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A run is already in progress on this engine.
    #[display("a queue run is already in progress")]
    AlreadyRunning,
    /// The worker thread could not be started.
    #[display("unable to start the queue worker")]
    Worker,
    /// An external tool is not installed or not where it was configured.
    #[display("{_0} not found")]
    ToolNotFound(#[error(not(source))] &'static str),
    /// An external tool could not be started.
    #[display("unable to run {_0}")]
    Spawn(#[error(not(source))] String),
    /// The action is neither `Compress` nor `Uncompress`.
    #[display("invalid action: {_0}")]
    InvalidAction(#[error(not(source))] String),
    /// A queue or snapshot file could not be read or written.
    #[display("unable to access queue file: {}", _0.display())]
    QueueFile(#[error(not(source))] PathBuf),
    /// A queue or snapshot file is not valid JSON of the expected shape.
    #[display("invalid queue file: {}", _0.display())]
    InvalidQueueFile(#[error(not(source))] PathBuf),
    /// A cue sheet could not be written next to its `.bin`.
    #[display("unable to write cue sheet: {}", _0.display())]
    CueSheet(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::Worker | Self::QueueFile(_))
    }
}
