//! The queue engine: drains a list of jobs on a dedicated worker thread.
//!
//! ```text
//! Idle --start--> Running --queue drained--> Idle
//!                    |
//!                 cancel
//!                    v
//!                 Stopping --active process terminated--> Idle
//! ```
//!
//! Jobs run strictly one after the other in submission order. The only
//! state shared with the controlling thread is the engine state, the
//! cancellation flag and the handle to the active external process.

use crate::codec::Outcome;
use crate::dispatch::DispatchTable;
use crate::error::{ErrorKind, Result};
use crate::job::Job;
use crate::observer::{QueueObserver, RunEnd, RunSummary};
use crate::process::{ExecContext, RunControl};
use exn::ResultExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::instrument;

/// How long a terminated process gets before it is killed.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Stopping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Delete each source file after it was processed successfully.
    pub delete_original: bool,
    /// Include the exact tool invocations in the status stream.
    pub verbose: bool,
    pub grace: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { delete_original: false, verbose: false, grace: DEFAULT_GRACE }
    }
}

type SharedState = Arc<Mutex<EngineState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs queues of [`Job`]s, one run at a time.
#[derive(Debug, Clone)]
pub struct QueueEngine {
    dispatch: Arc<DispatchTable>,
    options: RunOptions,
    state: SharedState,
}

impl QueueEngine {
    pub fn new(dispatch: DispatchTable, options: RunOptions) -> Self {
        Self { dispatch: Arc::new(dispatch), options, state: Arc::new(Mutex::new(EngineState::Idle)) }
    }

    pub fn state(&self) -> EngineState {
        *lock(&self.state)
    }

    /// Start draining `jobs` in a new run.
    ///
    /// An empty queue starts nothing and returns `Ok(None)`. Starting while
    /// another run is active is an [`ErrorKind::AlreadyRunning`] error.
    pub fn start(&self, jobs: Vec<Job>, observer: impl QueueObserver) -> Result<Option<RunHandle>> {
        if jobs.is_empty() {
            tracing::info!("Queue is empty; nothing to do");
            return Ok(None);
        }
        {
            let mut state = lock(&self.state);
            if *state != EngineState::Idle {
                exn::bail!(ErrorKind::AlreadyRunning);
            }
            *state = EngineState::Running;
        }
        let control = Arc::new(RunControl::new(self.options.grace));
        let worker = Worker {
            jobs: jobs.into(),
            dispatch: Arc::clone(&self.dispatch),
            options: self.options.clone(),
            control: Arc::clone(&control),
            observer: Box::new(observer),
        };
        let state = Arc::clone(&self.state);
        let spawned = thread::Builder::new().name("romc-queue".to_string()).spawn(move || {
            let summary = worker.drain();
            *lock(&state) = EngineState::Idle;
            worker.observer.finished(summary);
            summary
        });
        match spawned {
            Ok(thread) => Ok(Some(RunHandle { control, state: Arc::clone(&self.state), thread: Some(thread) })),
            Err(e) => {
                *lock(&self.state) = EngineState::Idle;
                Err(e).or_raise(|| ErrorKind::Worker)
            },
        }
    }
}

/// The controlling side of one run.
#[derive(Debug)]
pub struct RunHandle {
    control: Arc<RunControl>,
    state: SharedState,
    thread: Option<JoinHandle<RunSummary>>,
}

impl RunHandle {
    /// Ask the run to stop. The job in flight is terminated and no further
    /// jobs are started. Safe to call more than once.
    pub fn cancel(&self) {
        if self.control.cancel() {
            let mut state = lock(&self.state);
            if *state == EngineState::Running {
                *state = EngineState::Stopping;
            }
            tracing::info!("Queue cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.control.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the run to end.
    pub fn join(mut self) -> RunSummary {
        let cancelled = self.control.is_cancelled();
        let joined = self.thread.take().map(JoinHandle::join);
        match joined {
            Some(Ok(summary)) => summary,
            // The worker panicked; whatever it managed is lost.
            _ => {
                *lock(&self.state) = EngineState::Idle;
                let end = if cancelled { RunEnd::Cancelled } else { RunEnd::Completed };
                RunSummary { end, ..RunSummary::new() }
            },
        }
    }
}

struct Worker {
    jobs: VecDeque<Job>,
    dispatch: Arc<DispatchTable>,
    options: RunOptions,
    control: Arc<RunControl>,
    observer: Box<dyn QueueObserver>,
}

impl Worker {
    #[instrument("draining queue", skip(self), fields(jobs = self.jobs.len()))]
    fn drain(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        let total = self.jobs.len();
        for (index, job) in self.jobs.iter().enumerate() {
            if self.control.is_cancelled() {
                summary.end = RunEnd::Cancelled;
                break;
            }
            self.status(&format!("[{}/{total}] {} {} ({})", index + 1, job.action, job.name(), job.platform));
            let outcome = self.process(job);
            tracing::info!(path = %job.path.display(), platform = job.platform, outcome = %outcome, "Processed queue item");
            match outcome {
                Outcome::Succeeded => summary.succeeded += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Cancelled => summary.end = RunEnd::Cancelled,
            }
            self.observer.processed(&job.path);
            if summary.end == RunEnd::Cancelled {
                break;
            }
        }
        match summary.end {
            RunEnd::Completed => self.status("Queue finished."),
            RunEnd::Cancelled => self.status("Queue stopped by user."),
        }
        summary
    }

    fn process(&self, job: &Job) -> Outcome {
        let Some(codec) = self.dispatch.get_handler(&job.platform) else {
            let reason = format!("Platform not implemented: {}", job.platform);
            self.status(&reason);
            return Outcome::Skipped(reason);
        };
        if !job.path.exists() {
            let reason = format!("File not found, skipping: {}", job.path.display());
            self.status(&reason);
            return Outcome::Skipped(reason);
        }
        let ctx = ExecContext::new(self.observer.as_ref(), &self.control, &self.options);
        codec.execute(job, &ctx)
    }

    fn status(&self, line: &str) {
        tracing::debug!("{line}");
        self.observer.status(line);
    }
}
