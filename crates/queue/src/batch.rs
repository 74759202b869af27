//! Batch mode: a JSON array of job objects handed straight to one codec.
//!
//! ```json
//! [
//!   {"action": "Compress", "platform": "Sony Playstation 2", "path": "/roms/ps2/Okami.iso"},
//!   {"action": "Uncompress", "path": "/roms/switch/Zelda.nsz"}
//! ]
//! ```
//!
//! Entries are checked one by one as they are reached. A bad entry is
//! reported and skipped; only a file that is not a JSON array at all is an
//! error.

use crate::codec::{Codec, Outcome};
use crate::dispatch::CARTRIDGE_PLATFORMS;
use crate::engine::RunOptions;
use crate::error::{ErrorKind, Result};
use crate::job::{Action, Job};
use crate::observer::{QueueObserver, RunEnd, RunSummary};
use crate::process::{ExecContext, RunControl};
use exn::ResultExt;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Which codec a batch file is meant for. The two accept slightly different
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// `{action, platform, path}`; the action must be exactly `Compress` or
    /// `Uncompress` and the file must exist.
    Disc,
    /// `{action, path}`; the file must exist. Unknown actions are left for
    /// the codec to reject.
    Cartridge,
}

#[derive(Debug, Clone)]
pub struct Batch {
    kind: BatchKind,
    entries: Vec<Value>,
}

impl Batch {
    pub fn new(kind: BatchKind, entries: Vec<Value>) -> Self {
        Self { kind, entries }
    }

    pub fn load(kind: BatchKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::QueueFile(path.to_path_buf()))?;
        let entries: Vec<Value> =
            serde_json::from_str(&text).or_raise(|| ErrorKind::InvalidQueueFile(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded batch file");
        Ok(Self::new(kind, entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turn one entry into a job, or into the line explaining why it was
    /// skipped.
    pub fn job(&self, entry: &Value) -> std::result::Result<Job, String> {
        let path = entry.get("path").and_then(Value::as_str).filter(|p| !p.is_empty()).map(PathBuf::from);
        let action = match entry.get("action").and_then(Value::as_str) {
            Some("Compress") => Some(Action::Compress),
            Some("Uncompress") => Some(Action::Uncompress),
            _ => None,
        };
        match self.kind {
            BatchKind::Disc => {
                let (Some(action), Some(path)) = (action, path.filter(|p| p.exists())) else {
                    return Err(format!("Skipping invalid item: {entry}"));
                };
                let platform = entry.get("platform").and_then(Value::as_str).unwrap_or_default();
                Ok(Job::new(action, platform, path))
            },
            BatchKind::Cartridge => {
                let Some(path) = path.filter(|p| p.exists()) else {
                    let shown = match entry.get("path") {
                        Some(Value::String(p)) => p.clone(),
                        Some(other) => other.to_string(),
                        None => "null".to_string(),
                    };
                    return Err(format!("File not found: {shown}"));
                };
                match action {
                    Some(action) => Ok(Job::new(action, CARTRIDGE_PLATFORMS[0], path)),
                    None => Err(format!("Unsupported action or file type for: {}", path.display())),
                }
            },
        }
    }

    /// Feed every valid entry through `codec`, in order.
    pub fn run(
        &self,
        codec: &dyn Codec,
        observer: &dyn QueueObserver,
        control: &RunControl,
        options: &RunOptions,
    ) -> RunSummary {
        let mut summary = RunSummary::new();
        let ctx = ExecContext::new(observer, control, options);
        for entry in &self.entries {
            if control.is_cancelled() {
                summary.end = RunEnd::Cancelled;
                break;
            }
            let job = match self.job(entry) {
                Ok(job) => job,
                Err(reason) => {
                    tracing::warn!(%entry, "{reason}");
                    ctx.status(&reason);
                    summary.skipped += 1;
                    continue;
                },
            };
            match codec.execute(&job, &ctx) {
                Outcome::Succeeded => summary.succeeded += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Cancelled => summary.end = RunEnd::Cancelled,
            }
            observer.processed(&job.path);
            if summary.end == RunEnd::Cancelled {
                break;
            }
        }
        if summary.end == RunEnd::Cancelled {
            ctx.status("Queue stopped by user.");
        }
        observer.finished(summary);
        summary
    }
}
