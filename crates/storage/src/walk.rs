use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions skipped by default when system files are ignored.
pub const DEFAULT_SYSTEM_EXTENSIONS: [&str; 13] =
    [".ini", ".sys", ".dll", ".bat", ".tmp", ".lnk", ".dat", ".db", ".log", ".sav", ".cfg", ".bin", ".cue"];

/// Rules for which parts of a library folder a scan should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    ignored_folders: Vec<PathBuf>,
    pub ignore_textures: bool,
    pub ignore_system_files: bool,
    system_extensions: Vec<String>,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            ignored_folders: Vec::new(),
            ignore_textures: true,
            ignore_system_files: true,
            system_extensions: DEFAULT_SYSTEM_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ScanFilter {
    /// A filter that lets every file through.
    pub fn everything() -> Self {
        Self {
            ignored_folders: Vec::new(),
            ignore_textures: false,
            ignore_system_files: false,
            system_extensions: Vec::new(),
        }
    }

    pub fn with_ignored_folders<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.ignored_folders = folders.into_iter().map(|f| normalize(f.as_ref())).collect();
        self
    }

    /// Replace the system extension list. Extensions are matched
    /// case-insensitively and may be given with or without the leading dot.
    pub fn with_system_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.system_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{e}"))
            .collect();
        self
    }

    pub fn ignored_folders(&self) -> &[PathBuf] {
        &self.ignored_folders
    }

    pub fn system_extensions(&self) -> &[String] {
        &self.system_extensions
    }

    fn prunes(&self, dir: &Path) -> bool {
        if self.ignore_textures
            && dir.file_name().is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case("textures"))
        {
            return true;
        }
        !self.ignored_folders.is_empty() && self.ignored_folders.contains(&normalize(dir))
    }

    fn skips(&self, file: &Path) -> bool {
        if !self.ignore_system_files {
            return false;
        }
        let Some(extension) = file.extension() else {
            return false;
        };
        let extension = format!(".{}", extension.to_string_lossy().to_lowercase());
        self.system_extensions.contains(&extension)
    }
}

/// A regular file accepted by a [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Recursively list the files under `root` that pass `filter`.
///
/// Entries that cannot be read are logged and skipped; only a missing or
/// non-directory `root` is an error. Symlinks are not followed.
pub fn walk(root: impl AsRef<Path>, filter: &ScanFilter) -> Result<impl Iterator<Item = FoundFile> + '_> {
    let root = root.as_ref();
    if !root.exists() {
        exn::bail!(ErrorKind::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        exn::bail!(ErrorKind::NotADirectory(root.to_path_buf()));
    }
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| entry.depth() == 0 || !entry.file_type().is_dir() || !filter.prunes(entry.path()));
    Ok(walker.filter_map(move |entry| accept(entry, filter)))
}

fn accept(entry: walkdir::Result<DirEntry>, filter: &ScanFilter) -> Option<FoundFile> {
    let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
            let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
            tracing::warn!(path, error = %e, "Skipping unreadable entry");
            return None;
        },
    };
    if !entry.file_type().is_file() || filter.skips(entry.path()) {
        return None;
    }
    match entry.metadata() {
        Ok(meta) => Some(FoundFile { path: entry.into_path(), size: meta.len() }),
        Err(e) => {
            tracing::warn!(path = %entry.path().display(), error = %e, "Skipping file without metadata");
            None
        },
    }
}

/// Lexically normalize a path: drop `.` components, resolve `..` against
/// the preceding component, and ignore trailing separators.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    out
}
