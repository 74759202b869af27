use super::App;
use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use romc_cache::Repository;
use romc_library::{Refreshed, refresh_cached};
use romc_queue::{
    Action, DispatchTable, Job, QueueEngine, QueueEvent, QueueObserver, RunEnd, RunSummary, Snapshot,
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Run the jobs in this snapshot-format file instead of the queued
    /// cache rows
    #[arg(long)]
    pub queue: Option<PathBuf>,
    /// Delete each original after it was processed successfully
    #[arg(long)]
    pub delete_original: bool,
    /// Keep the queue snapshot after a completed run
    #[arg(long)]
    pub keep_snapshot: bool,
}

/// Forwards engine events onto the async side.
struct TokioObserver {
    tx: UnboundedSender<QueueEvent>,
}

impl QueueObserver for TokioObserver {
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

/// The work queue as stored in the cache, in insertion order.
async fn queued_jobs(repo: &Repository) -> Result<Vec<Job>> {
    let rows = repo.queued().await.or_raise(|| ErrorKind::Cache)?;
    let mut jobs = Vec::with_capacity(rows.len());
    for row in rows {
        let label = row.action.unwrap_or_default();
        match label.parse::<Action>() {
            Ok(action) => jobs.push(Job::new(action, row.rom.platform, row.rom.path)),
            Err(_) => tracing::warn!(path = %row.rom.path.display(), action = %label, "Ignoring queued row with unknown action"),
        }
    }
    Ok(jobs)
}

pub async fn execute(app: &App, args: RunArgs) -> Result<()> {
    let (db, repo) = app.cache().await?;
    let resolver = app.resolver()?;
    let jobs = match &args.queue {
        Some(file) => Snapshot::new(file).load().or_raise(|| ErrorKind::Queue)?,
        None => queued_jobs(&repo).await?,
    };
    let snapshot = Snapshot::new(&app.config.queue.snapshot);
    if !jobs.is_empty() {
        snapshot.save(&jobs).or_raise(|| ErrorKind::Queue)?;
    }

    let engine = QueueEngine::new(DispatchTable::standard(&app.tools()), app.run_options(args.delete_original));
    let (tx, mut rx) = unbounded_channel();
    let Some(handle) = engine.start(jobs, TokioObserver { tx }).or_raise(|| ErrorKind::Queue)? else {
        println!("There are no items in the queue. Nothing was done.");
        db.close().await;
        return Ok(());
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    // The channel closes once the worker is done and has dropped the observer.
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(QueueEvent::Status(line)) => println!("{line}"),
                Some(QueueEvent::Processed(path)) => match refresh_cached(&repo, &path, &resolver).await {
                    Ok(Refreshed::Updated(rom)) => tracing::debug!(path = %rom.path.display(), size = rom.size, "Refreshed cache row"),
                    Ok(Refreshed::Missing) => {},
                    Err(e) => tracing::warn!(path = %path.display(), error = ?e, "Unable to refresh cache row"),
                },
                Some(QueueEvent::Finished(_)) => {},
                None => break,
            },
            _ = &mut ctrl_c, if !handle.is_cancelled() => {
                println!("Queue stopping...");
                handle.cancel();
            },
        }
    }

    let summary = handle.join();
    println!(
        "Processed {}: {} succeeded, {} failed, {} skipped",
        summary.processed(),
        summary.succeeded,
        summary.failed,
        summary.skipped
    );
    if summary.end == RunEnd::Completed && !args.keep_snapshot {
        snapshot.remove().or_raise(|| ErrorKind::Queue)?;
    }
    db.close().await;
    Ok(())
}
