//! Platform inference for ROM files.
//!
//! ROM libraries are usually organised by console, but nobody agrees on how
//! to spell a console: `Sony Playstation 2/`, `PS2/`, `playstation_2/` and
//! `roms/ps2_games/` all mean the same thing. This crate turns an arbitrary
//! filesystem path into a canonical platform label using a weighted substring
//! search over a [`PlatformTable`].
//!
//! The table is an explicit, immutable value handed to the [`Resolver`] at
//! construction. There is no process-wide platform list; tests and callers
//! inject whatever table they need.
//!
//! ```
//! use romc_platform::{PlatformTable, Resolver};
//!
//! let resolver = Resolver::new(PlatformTable::default());
//! assert_eq!(resolver.resolve("/roms/Playstation 2/game.iso"), "Sony Playstation 2");
//! assert_eq!(resolver.resolve("/roms/Xbox 360/game.iso"), "Microsoft Xbox 360");
//! assert_eq!(resolver.resolve("/random/unrecognized/path/file.bin"), "Unknown");
//! ```

mod entry;
pub mod error;
mod resolve;
mod table;

pub use crate::entry::PlatformEntry;
pub use crate::resolve::{Match, Resolver};
pub use crate::table::PlatformTable;

/// Label returned when no platform term matches a path.
pub const UNKNOWN: &str = "Unknown";
/// Canonical label for the Xbox 360, which is special-cased ahead of the
/// weighted search.
pub const XBOX_360: &str = "Microsoft Xbox 360";
