use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use romc_cache::Repository;
use romc_platform::Resolver;
use romc_storage::{RomFile, ScanFilter, walk};
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tracing::instrument;

/// Walk `folder` and describe every file that passes `filter`.
#[instrument(skip_all, fields(folder = %folder.as_ref().display()))]
pub fn scan(folder: impl AsRef<Path>, filter: &ScanFilter, resolver: &Resolver) -> Result<Vec<RomFile>> {
    let folder = folder.as_ref();
    let roms: Vec<RomFile> = walk(folder, filter)
        .or_raise(|| ErrorKind::Scan(folder.to_path_buf()))?
        .map(|found| {
            let platform = resolver.resolve(&found.path).to_string();
            RomFile::new(found.path, platform, found.size)
        })
        .collect();
    tracing::info!(files = roms.len(), "Scan complete");
    Ok(roms)
}

/// Replace the cache contents with a fresh scan of `folder`.
pub async fn scan_into(
    cache: &Repository,
    folder: impl AsRef<Path>,
    filter: &ScanFilter,
    resolver: &Resolver,
) -> Result<Vec<RomFile>> {
    let roms = scan(folder, filter, resolver)?;
    cache.clear().await.or_raise(|| ErrorKind::Cache)?;
    cache.insert(&roms).await.or_raise(|| ErrorKind::Cache)?;
    Ok(roms)
}

/// Re-read a single file. `None` means the file no longer exists.
pub fn refresh(path: impl AsRef<Path>, resolver: &Resolver) -> Result<Option<RomFile>> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(RomFile::new(path, resolver.resolve(path), meta.len()))),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).or_raise(|| ErrorKind::Stat(path.to_path_buf())),
    }
}

/// What [`refresh_cached`] did to the cache row for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refreshed {
    /// The file still exists; its row now carries the new size and no action.
    Updated(RomFile),
    /// The file is gone. Its row stays, with no action, so listings can
    /// show it as missing.
    Missing,
}

/// Bring the cache row for `path` in line with the disk after the queue has
/// processed it.
pub async fn refresh_cached(cache: &Repository, path: impl AsRef<Path>, resolver: &Resolver) -> Result<Refreshed> {
    let path = path.as_ref();
    match refresh(path, resolver)? {
        Some(rom) => {
            cache.insert(std::slice::from_ref(&rom)).await.or_raise(|| ErrorKind::Cache)?;
            cache.set_action(path, None).await.or_raise(|| ErrorKind::Cache)?;
            Ok(Refreshed::Updated(rom))
        },
        None => {
            cache.set_action(path, None).await.or_raise(|| ErrorKind::Cache)?;
            tracing::debug!(path = %path.display(), "Processed file is gone; kept as missing");
            Ok(Refreshed::Missing)
        },
    }
}
