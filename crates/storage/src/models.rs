//! Storage models.

use crate::size::human_size;
use romc_compress::Container;
use std::path::{Path, PathBuf};

/// A single file found in a ROM library.
///
/// This is the unit that flows from a scan into the cache and back out to
/// the queue: the file name and platform are what a user sees, the path is
/// what the codecs act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomFile {
    /// Base name of the file, e.g. `"Crash Bandicoot.cue"`
    pub file_name: String,
    /// Resolved platform label, e.g. `"Sony Playstation"`
    pub platform: String,
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Container detected from the file extension
    pub container: Container,
}

impl RomFile {
    pub fn new(path: impl Into<PathBuf>, platform: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let file_name = file_name(&path);
        let container = Container::from_path(&file_name);
        Self { file_name, platform: platform.into(), path, size, container }
    }

    pub fn is_compressed(&self) -> bool {
        self.container.is_compressed()
    }

    /// The size rendered for display, e.g. `"1.50 GB"`.
    pub fn human_size(&self) -> String {
        human_size(self.size)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_name_and_container() {
        let rom = RomFile::new("/roms/psx/Crash Bandicoot.CHD", "Sony Playstation", 1024);
        assert_eq!(rom.file_name, "Crash Bandicoot.CHD");
        assert_eq!(rom.container, Container::Chd);
        assert!(rom.is_compressed());
        assert_eq!(rom.human_size(), "1.00 KB");
    }

    #[test]
    fn test_uncompressed() {
        let rom = RomFile::new("/roms/switch/Zelda.nsp", "Nintendo Switch", 10);
        assert_eq!(rom.container, Container::None);
        assert!(!rom.is_compressed());
    }
}
