//! ROM files on disk.
//!
//! Everything here is synchronous and filesystem-local: a [`walk`] over a
//! library folder honouring a [`ScanFilter`], the [`RomFile`] record that the
//! rest of the workspace passes around, and the human-readable size helpers
//! used for display and for reading legacy cache rows.

pub mod error;
mod models;
mod size;
mod walk;

pub use crate::models::RomFile;
pub use crate::size::{human_size, parse_size};
pub use crate::walk::{DEFAULT_SYSTEM_EXTENSIONS, FoundFile, ScanFilter, walk};
