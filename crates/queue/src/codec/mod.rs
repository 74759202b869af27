//! Codec adapters: the glue between a [`Job`] and an external tool.

mod cartridge;
mod cue;
mod disc;

pub use self::cartridge::CartridgeCodec;
pub use self::cue::cue_sheet;
pub use self::disc::DiscCodec;

use crate::job::Job;
use crate::process::{ExecContext, ProcessEnd};
use crate::tool::Tool;
use derive_more::Display;
use std::path::Path;
use std::process::Command;

/// Why a job failed.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Failure {
    #[display("exit code {_0}")]
    ExitCode(i32),
    #[display("terminated by signal")]
    Signalled,
    /// The tool could not be found or started, or a file it needs could not
    /// be written.
    #[display("{_0}")]
    Setup(String),
}

/// The terminal state of one job.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Outcome {
    #[display("succeeded")]
    Succeeded,
    #[display("failed: {_0}")]
    Failed(Failure),
    #[display("skipped: {_0}")]
    Skipped(String),
    #[display("cancelled")]
    Cancelled,
}

/// Executes jobs for some family of platforms.
///
/// Implementations report everything they decide through
/// [`ExecContext::status`] and never panic or return errors: a job that
/// cannot be done is [`Outcome::Skipped`] or [`Outcome::Failed`], and the
/// queue moves on.
pub trait Codec: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(&self, job: &Job, ctx: &ExecContext<'_>) -> Outcome;
}

/// Locate `tool` and run it with `args`, mapping every way that can go wrong
/// onto an [`Outcome`].
pub(crate) fn run_tool<I, S>(ctx: &ExecContext<'_>, tool: &Tool, args: I) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let program = match tool.locate() {
        Ok(program) => program,
        Err(e) => {
            let reason = (*e).to_string();
            ctx.status(format!("ERROR: {reason}"));
            return Outcome::Failed(Failure::Setup(reason));
        },
    };
    let mut command = Command::new(program);
    command.args(args);
    match ctx.run(command) {
        Ok(ProcessEnd::Exited(0)) => Outcome::Succeeded,
        Ok(ProcessEnd::Exited(code)) => Outcome::Failed(Failure::ExitCode(code)),
        Ok(ProcessEnd::Signalled) => Outcome::Failed(Failure::Signalled),
        Ok(ProcessEnd::Cancelled) => Outcome::Cancelled,
        Err(e) => {
            let reason = (*e).to_string();
            ctx.status(format!("ERROR: {reason}"));
            Outcome::Failed(Failure::Setup(reason))
        },
    }
}

/// Delete the job's source after a success, if asked to. A failed delete is
/// reported but does not change the outcome.
pub(crate) fn cleanup(ctx: &ExecContext<'_>, source: &Path, outcome: &Outcome) {
    if *outcome != Outcome::Succeeded || !ctx.delete_original() {
        return;
    }
    match std::fs::remove_file(source) {
        Ok(()) => ctx.status(format!("Deleted original: {}", source.display())),
        Err(e) => {
            tracing::warn!(path = %source.display(), error = %e, "Unable to delete original");
            ctx.status(format!("Could not delete original {}: {e}", source.display()));
        },
    }
}
