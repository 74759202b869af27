//! Running one external process at a time, cancellably.
//!
//! A run owns a [`RunControl`]: the cancellation flag and a slot for the one
//! process that may be active. The worker spawns a tool through an
//! [`ExecContext`], which streams the tool's merged stdout/stderr into the
//! status stream line by line and polls the flag while doing so. The
//! controller only ever touches the flag and, through [`RunControl::cancel`],
//! sends the active process a terminate request.

use crate::engine::RunOptions;
use crate::error::{ErrorKind, Result};
use crate::observer::QueueObserver;
use exn::ResultExt;
use std::ffi::OsStr;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(50);
const READ_CHUNK: usize = 4096;

/// How an external process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessEnd {
    Exited(i32),
    /// Killed by a signal that the run did not send.
    Signalled,
    /// Terminated because the run was cancelled.
    Cancelled,
}

impl From<ExitStatus> for ProcessEnd {
    fn from(status: ExitStatus) -> Self {
        status.code().map_or(Self::Signalled, Self::Exited)
    }
}

/// Cancellation state shared between a run's worker and its controller.
#[derive(Debug)]
pub struct RunControl {
    cancelled: AtomicBool,
    active: Mutex<Option<Child>>,
    grace: Duration,
}

impl RunControl {
    /// `grace` is how long a terminated process gets to exit before it is
    /// killed outright.
    pub fn new(grace: Duration) -> Self {
        Self { cancelled: AtomicBool::new(false), active: Mutex::new(None), grace }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Request cancellation and ask the active process (if any) to terminate.
    ///
    /// Only the first call does anything; returns whether this was it.
    pub fn cancel(&self) -> bool {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(child) = self.active().as_mut() {
            tracing::debug!(pid = child.id(), "Cancel requested; asking active process to terminate");
            request_terminate(child);
        }
        true
    }

    pub fn has_active_process(&self) -> bool {
        self.active().is_some()
    }

    fn active(&self) -> MutexGuard<'_, Option<Child>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Terminate the active process: a graceful request, then a kill once the
    /// grace period is up. The slot is empty afterwards.
    fn terminate(&self) -> Option<ExitStatus> {
        let mut child = self.active().take()?;
        let pid = child.id();
        request_terminate(&mut child);
        let deadline = Instant::now() + self.grace;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(pid, error = %e, "Unable to poll terminated process");
                    break;
                },
            }
        }
        tracing::warn!(pid, grace_ms = self.grace.as_millis() as u64, "Process ignored terminate request; killing");
        if let Err(e) = child.kill() {
            tracing::warn!(pid, error = %e, "Unable to kill process");
        }
        child.wait().ok()
    }

    /// Poll the active process without blocking. `None` while it is still
    /// running; the slot is cleared once it has exited.
    fn reap(&self) -> Option<std::io::Result<ExitStatus>> {
        let mut slot = self.active();
        let result = match slot.as_mut()?.try_wait() {
            Ok(None) => return None,
            Ok(Some(status)) => Ok(status),
            Err(e) => Err(e),
        };
        slot.take();
        Some(result)
    }
}

#[cfg(unix)]
fn request_terminate(child: &mut Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    let Ok(pid) = i32::try_from(child.id()) else {
        _ = child.kill();
        return;
    };
    if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
        tracing::debug!(pid, error = %e, "SIGTERM failed");
    }
}

#[cfg(not(unix))]
fn request_terminate(child: &mut Child) {
    _ = child.kill();
}

/// What a codec gets to work with while executing one job.
pub struct ExecContext<'a> {
    observer: &'a dyn QueueObserver,
    control: &'a RunControl,
    delete_original: bool,
    verbose: bool,
}

impl<'a> ExecContext<'a> {
    pub fn new(observer: &'a dyn QueueObserver, control: &'a RunControl, options: &RunOptions) -> Self {
        Self { observer, control, delete_original: options.delete_original, verbose: options.verbose }
    }

    /// Emit a line to the status stream.
    pub fn status(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::debug!("{line}");
        self.observer.status(line);
    }

    /// Emit a line to the status stream only in verbose mode; it is logged
    /// at debug level either way.
    pub fn detail(&self, line: impl AsRef<str>) {
        if self.verbose {
            self.status(line);
        } else {
            tracing::debug!("{}", line.as_ref());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.control.is_cancelled()
    }

    /// Whether the source file should be deleted after a successful job.
    pub fn delete_original(&self) -> bool {
        self.delete_original
    }

    /// Run `command` to completion, forwarding each line of its output to the
    /// status stream. Returns early with [`ProcessEnd::Cancelled`] if the run
    /// is cancelled meanwhile.
    pub fn run(&self, mut command: Command) -> Result<ProcessEnd> {
        let program = command.get_program().to_string_lossy().into_owned();
        self.detail(format!("Running command: {}", render(&command)));
        if self.is_cancelled() {
            return Ok(ProcessEnd::Cancelled);
        }
        command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = command.spawn().or_raise(|| ErrorKind::Spawn(program.clone()))?;
        tracing::debug!(pid = child.id(), program = program.as_str(), "Spawned process");

        let (tx, rx) = mpsc::channel();
        let readers = match spawn_readers(&mut child, tx) {
            Ok(readers) => readers,
            Err(e) => {
                _ = child.kill();
                _ = child.wait();
                return Err(e).or_raise(|| ErrorKind::Spawn(program));
            },
        };
        *self.control.active() = Some(child);

        // Stream output until both pipes close.
        loop {
            if self.is_cancelled() {
                self.control.terminate();
                return Ok(ProcessEnd::Cancelled);
            }
            match rx.recv_timeout(POLL) {
                Ok(line) => self.status(line),
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        for reader in readers {
            _ = reader.join();
        }
        // Then wait for the exit status.
        loop {
            if self.is_cancelled() {
                self.control.terminate();
                return Ok(ProcessEnd::Cancelled);
            }
            match self.control.reap() {
                Some(Ok(status)) => return Ok(ProcessEnd::from(status)),
                Some(Err(e)) => return Err(e).or_raise(|| ErrorKind::Spawn(program)),
                None => thread::sleep(POLL),
            }
        }
    }
}

fn spawn_readers(child: &mut Child, tx: Sender<String>) -> std::io::Result<Vec<JoinHandle<()>>> {
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(forward(stdout, tx.clone())?);
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(forward(stderr, tx)?);
    }
    Ok(readers)
}

/// Forward a stream line by line. Carriage returns count as line breaks so
/// that progress counters show up as they are printed.
fn forward(mut stream: impl Read + Send + 'static, tx: Sender<String>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new().name("romc-output".to_string()).spawn(move || {
        let mut chunk = [0u8; READ_CHUNK];
        let mut pending = Vec::new();
        loop {
            let read = match stream.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(read) => read,
            };
            pending.extend_from_slice(&chunk[..read]);
            while let Some(end) = pending.iter().position(|b| matches!(b, b'\n' | b'\r')) {
                let line: Vec<u8> = pending.drain(..=end).collect();
                if !send_line(&tx, &line) {
                    return;
                }
            }
        }
        send_line(&tx, &pending);
    })
}

/// Returns `false` once nobody is listening.
fn send_line(tx: &Sender<String>, bytes: &[u8]) -> bool {
    let line = String::from_utf8_lossy(bytes);
    let line = line.trim_end();
    line.is_empty() || tx.send(line.to_string()).is_ok()
}

/// Render a command for display, quoting arguments that contain spaces.
pub(crate) fn render(command: &Command) -> String {
    std::iter::once(command.get_program()).chain(command.get_args()).map(quote).collect::<Vec<_>>().join(" ")
}

fn quote(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    if arg.is_empty() || arg.contains(char::is_whitespace) { format!("\"{arg}\"") } else { arg.into_owned() }
}
