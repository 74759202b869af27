use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// A minimal single-track cue sheet for a raw PlayStation 2 `.bin` dump.
pub fn cue_sheet(bin_name: &str) -> String {
    format!("FILE \"{bin_name}\" BINARY\n  TRACK 01 MODE2/2352\n    INDEX 01 00:00:00\n")
}

/// Write a cue sheet next to `bin`, with the same base name, and return its
/// path. The sheet refers to the `.bin` by file name only.
pub(crate) fn synthesize(bin: &Path) -> Result<PathBuf> {
    let cue = bin.with_extension("cue");
    let bin_name = bin.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    std::fs::write(&cue, cue_sheet(&bin_name)).or_raise(|| ErrorKind::CueSheet(cue.clone()))?;
    tracing::info!(cue = %cue.display(), bin = bin_name, "Synthesized cue sheet");
    Ok(cue)
}
