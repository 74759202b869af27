use super::App;
use crate::cli::BatchArgs;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use romc_queue::{Batch, BatchKind, CartridgeCodec, Codec, DiscCodec, QueueObserver, RunControl, RunOptions, RunSummary, Tool};
use std::path::Path;
use std::sync::Arc;

/// Batch feedback is plain text on stdout.
struct Stdout;

impl QueueObserver for Stdout {
    fn status(&self, line: &str) {
        println!("{line}");
    }

    fn processed(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "Batch item done");
    }

    fn finished(&self, summary: RunSummary) {
        tracing::info!(succeeded = summary.succeeded, failed = summary.failed, skipped = summary.skipped, "Batch finished");
    }
}

pub async fn execute(app: &App, kind: BatchKind, args: BatchArgs) -> Result<()> {
    if !args.queue_file.exists() {
        println!("Queue file not found: {}", args.queue_file.display());
        return Ok(());
    }
    let batch = Batch::load(kind, &args.queue_file).or_raise(|| ErrorKind::Queue)?;
    let tools = app.tools();
    let codec: Box<dyn Codec> = match kind {
        BatchKind::Disc => Box::new(DiscCodec::new(Tool::chdman(tools.chdman))),
        BatchKind::Cartridge => Box::new(CartridgeCodec::new(Tool::nsz(tools.nsz))),
    };
    // Batch mode never deletes originals.
    let options = RunOptions { delete_original: false, ..app.run_options(false) };
    let control = Arc::new(RunControl::new(options.grace));

    let worker = {
        let control = Arc::clone(&control);
        tokio::task::spawn_blocking(move || batch.run(codec.as_ref(), &Stdout, &control, &options))
    };
    tokio::pin!(worker);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            joined = &mut worker => {
                joined.or_raise(|| ErrorKind::Queue)?;
                return Ok(());
            },
            _ = &mut ctrl_c, if !control.is_cancelled() => {
                control.cancel();
            },
        }
    }
}
