use romc_storage::{RomFile, human_size};
use std::fmt;

/// Count and combined size of a group of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub count: usize,
    pub bytes: u64,
}

impl Totals {
    fn of(roms: &[RomFile]) -> Self {
        Self { count: roms.len(), bytes: roms.iter().map(|r| r.size).sum() }
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Total size: {}", self.count, human_size(self.bytes))
    }
}

/// A set of ROM files split by compression state, each side keeping the
/// order the files were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub compressed: Vec<RomFile>,
    pub uncompressed: Vec<RomFile>,
}

impl Inventory {
    pub fn split(roms: impl IntoIterator<Item = RomFile>) -> Self {
        let (compressed, uncompressed) = roms.into_iter().partition(RomFile::is_compressed);
        Self { compressed, uncompressed }
    }

    pub fn compressed_totals(&self) -> Totals {
        Totals::of(&self.compressed)
    }

    pub fn uncompressed_totals(&self) -> Totals {
        Totals::of(&self.uncompressed)
    }

    pub fn len(&self) -> usize {
        self.compressed.len() + self.uncompressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compressed.is_empty() && self.uncompressed.is_empty()
    }

    /// Keep only the files for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&RomFile) -> bool) {
        self.compressed.retain(&mut keep);
        self.uncompressed.retain(&mut keep);
    }
}
