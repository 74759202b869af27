//! The ROM inventory.
//!
//! Ties the filesystem walker, the platform resolver and the container
//! classifier together: a scan turns a folder into [`RomFile`] records, an
//! [`Inventory`] splits them by compression state, and [`refresh`] re-reads a
//! single file after the queue has touched it.

pub mod error;
mod inventory;
mod scan;

pub use crate::inventory::{Inventory, Totals};
pub use crate::scan::{Refreshed, refresh, refresh_cached, scan, scan_into};
pub use romc_storage::RomFile;
