//! Sequential, cancellable compression queue for ROM files.
//!
//! A run takes an ordered list of [`Job`]s, looks each one up in a
//! [`DispatchTable`] by platform label, and hands it to the matching
//! [`Codec`], which drives an external tool (`chdman` for disc images, `nsz`
//! for Nintendo Switch cartridges). Runs happen on a dedicated worker thread
//! owned by the [`QueueEngine`]; progress comes back through a
//! [`QueueObserver`].
//!
//! ```no_run
//! use romc_queue::{Action, ChannelObserver, DispatchTable, Job, QueueEngine, QueueEvent, RunOptions, ToolPaths};
//!
//! let engine = QueueEngine::new(DispatchTable::standard(&ToolPaths::default()), RunOptions::default());
//! let (observer, events) = ChannelObserver::channel();
//! let jobs = vec![Job::new(Action::Compress, "Sony Playstation", "/roms/psx/Crash.cue")];
//! if let Some(run) = engine.start(jobs, observer)? {
//!     for event in events {
//!         if let QueueEvent::Status(line) = event {
//!             println!("{line}");
//!         }
//!     }
//!     run.join();
//! }
//! # Ok::<(), romc_queue::error::Error>(())
//! ```

mod batch;
mod codec;
mod dispatch;
mod engine;
pub mod error;
mod job;
mod observer;
mod process;
mod snapshot;
mod tool;

pub use crate::batch::{Batch, BatchKind};
pub use crate::codec::{CartridgeCodec, Codec, DiscCodec, Failure, Outcome, cue_sheet};
pub use crate::dispatch::{CARTRIDGE_PLATFORMS, DISC_PLATFORMS, DispatchTable, ToolPaths};
pub use crate::engine::{DEFAULT_GRACE, EngineState, QueueEngine, RunHandle, RunOptions};
pub use crate::job::{Action, Job};
pub use crate::observer::{ChannelObserver, QueueEvent, QueueObserver, RunEnd, RunSummary};
pub use crate::process::{ExecContext, ProcessEnd, RunControl};
pub use crate::snapshot::Snapshot;
pub use crate::tool::Tool;
