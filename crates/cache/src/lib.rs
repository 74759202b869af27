//! SQLite cache database for the ROM inventory.
//!
//! The cache remembers the last scan of a library folder so that listing and
//! queueing do not have to walk the disk again. It is not the source of
//! truth: the files are. If the database is deleted it is rebuilt by the next
//! scan.
//!
//! Each row is one [`RomFile`](romc_storage::RomFile) plus an optional queued
//! action label. Rows come back in insertion order, which is also the order
//! the work queue is built in.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::CachedRom;
pub use crate::repo::Repository;
