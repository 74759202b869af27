use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Every job was taken off the queue.
    Completed,
    /// The user stopped the run; remaining jobs were not started.
    Cancelled,
}

/// Per-run tallies, reported when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub end: RunEnd,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub(crate) fn new() -> Self {
        Self { end: RunEnd::Completed, succeeded: 0, failed: 0, skipped: 0 }
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// Receives everything a run has to say.
///
/// All methods are called from the worker thread, in order: every status line
/// and the `processed` call for job K happen before anything for job K+1, and
/// `finished` is always the last call of a run.
pub trait QueueObserver: Send + 'static {
    /// A human-readable status line: tool output, decisions, warnings.
    fn status(&self, line: &str);
    /// A job has reached a terminal state (succeeded, failed, skipped or
    /// cancelled mid-flight). Carries the job's source path.
    fn processed(&self, path: &Path);
    /// The run is over and the engine is idle again.
    fn finished(&self, summary: RunSummary);
}

/// A [`QueueObserver`] event, for delivery over a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Status(String),
    Processed(PathBuf),
    Finished(RunSummary),
}

/// Forwards every event into a [`std::sync::mpsc`] channel.
///
/// Sending never blocks; events are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<QueueEvent>,
}

impl ChannelObserver {
    pub fn channel() -> (Self, Receiver<QueueEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl QueueObserver for ChannelObserver {
    fn status(&self, line: &str) {
        _ = self.tx.send(QueueEvent::Status(line.to_string()));
    }

    fn processed(&self, path: &Path) {
        _ = self.tx.send(QueueEvent::Processed(path.to_path_buf()));
    }

    fn finished(&self, summary: RunSummary) {
        _ = self.tx.send(QueueEvent::Finished(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_delivers_in_order() {
        let (observer, rx) = ChannelObserver::channel();
        observer.status("hello");
        observer.processed(Path::new("/a.iso"));
        observer.finished(RunSummary::new());
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                QueueEvent::Status("hello".to_string()),
                QueueEvent::Processed(PathBuf::from("/a.iso")),
                QueueEvent::Finished(RunSummary::new()),
            ]
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (observer, rx) = ChannelObserver::channel();
        drop(rx);
        observer.status("nobody listening");
    }
}
