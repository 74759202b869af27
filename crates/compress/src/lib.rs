//! Compression-state classification for ROM files.
//!
//! ROM dumps are either raw images (`.iso`, `.bin`, `.nsp`, ...) or wrapped
//! in a compressed container produced by an external codec (`.chd` from the
//! disc codec, `.nsz` from the cartridge codec, ...). This crate maps file
//! extensions onto a [`Container`] so that the rest of the workspace can
//! split a library into compressed and uncompressed files:
//!
//! - **Format detection** from file names ([`Container::from_path`])
//! - **Parsing** of stored format names ([`Container::from_str`](std::str::FromStr))
//! - **Classification** shortcut ([`is_compressed`])
//!
//! Matching is case-insensitive and only ever looks at the final extension.

mod construct;
pub mod error;
mod util;

use std::path::Path;

/// A known compressed ROM container.
///
/// Anything not listed here is treated as a raw (uncompressed) dump and maps
/// to [`None`](Self::None).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Container {
    /// Raw, uncompressed dump
    #[default]
    None,
    /// MAME Compressed Hunks of Data (.chd), the disc codec's format
    Chd,
    /// Compressed Nintendo Switch package (.nsz)
    Nsz,
    /// Compressed Nintendo Switch cartridge image (.xcz)
    Xcz,
    /// Compressed Nintendo Switch content archive (.ncz)
    Ncz,
    /// Compressed ISO (.cso)
    Cso,
    /// Zstandard-compressed ISO (.zso)
    Zso,
    /// Dolphin modern compressed GameCube/Wii image (.rvz)
    Rvz,
    /// Dolphin legacy compressed GameCube/Wii image (.gcz)
    Gcz,
    /// Wii ISO Archive (.wia)
    Wia,
    /// Generic 7-Zip archive (.7z)
    SevenZip,
    /// Generic ZIP archive (.zip)
    Zip,
}

/// Returns `true` if the file name carries a compressed container extension.
///
/// ```
/// use romc_compress::is_compressed;
/// assert!(is_compressed("Game.NSZ"));
/// assert!(!is_compressed("game.nsp"));
/// ```
#[must_use]
pub fn is_compressed(file_name: impl AsRef<Path>) -> bool {
    Container::from_path(file_name).is_compressed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn container_default() {
        assert_eq!(Container::default(), Container::None);
    }

    #[rstest]
    #[case("Game.NSZ", true)]
    #[case("game.nsz", true)]
    #[case("game.nsp", false)]
    #[case("Final Fantasy X.chd", true)]
    #[case("Final Fantasy X.bin", false)]
    #[case("Final Fantasy X.cue", false)]
    #[case("zelda.rvz", true)]
    #[case("README", false)]
    #[case("", false)]
    fn test_is_compressed(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_compressed(name), expected);
    }

    #[test]
    fn test_is_compressed_ignores_casing() {
        assert_eq!(is_compressed("Game.NSZ"), is_compressed("game.nsz"));
        assert_eq!(is_compressed("GAME.CHD"), is_compressed("game.chd"));
    }
}
