//! The durable queue snapshot.
//!
//! Before a run starts, the jobs are written out as a JSON array so that an
//! interrupted run can be inspected or restarted:
//!
//! ```json
//! [
//!   {"action": "Compress", "name": "Okami.iso", "path": "/roms/ps2/Okami.iso", "platform": "Sony Playstation 2"}
//! ]
//! ```

use crate::error::{ErrorKind, Result};
use crate::job::{Action, Job};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    action: Action,
    name: String,
    path: PathBuf,
    platform: String,
}

impl From<&Job> for Entry {
    fn from(job: &Job) -> Self {
        Self { action: job.action, name: job.name(), path: job.path.clone(), platform: job.platform.clone() }
    }
}

impl From<Entry> for Job {
    fn from(entry: Entry) -> Self {
        Job::new(entry.action, entry.platform, entry.path)
    }
}

/// A queue snapshot file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `jobs` out, replacing any previous snapshot.
    pub fn save(&self, jobs: &[Job]) -> Result<()> {
        let entries: Vec<Entry> = jobs.iter().map(Entry::from).collect();
        let json = serde_json::to_string_pretty(&entries).or_raise(|| ErrorKind::InvalidQueueFile(self.path.clone()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::QueueFile(self.path.clone()))?;
        }
        std::fs::write(&self.path, json).or_raise(|| ErrorKind::QueueFile(self.path.clone()))?;
        tracing::debug!(path = %self.path.display(), jobs = jobs.len(), "Saved queue snapshot");
        Ok(())
    }

    /// Read the snapshot back. A missing file is an empty queue.
    pub fn load(&self) -> Result<Vec<Job>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).or_raise(|| ErrorKind::QueueFile(self.path.clone())),
        };
        let entries: Vec<Entry> =
            serde_json::from_str(&text).or_raise(|| ErrorKind::InvalidQueueFile(self.path.clone()))?;
        Ok(entries.into_iter().map(Job::from).collect())
    }

    /// Delete the snapshot, if there is one.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).or_raise(|| ErrorKind::QueueFile(self.path.clone())),
        }
    }
}
