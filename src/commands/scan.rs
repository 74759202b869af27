use super::App;
use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::{OptionExt, ResultExt};
use romc_library::{Inventory, scan_into};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Library folder; defaults to `library.default_folder`
    pub folder: Option<PathBuf>,
}

pub async fn execute(app: &App, args: ScanArgs) -> Result<()> {
    let folder = args.folder.or_else(|| app.config.library.default_folder.clone()).ok_or_raise(|| ErrorKind::NoFolder)?;
    let folder = std::path::absolute(&folder).or_raise(|| ErrorKind::InvalidArgument(folder.display().to_string()))?;
    let resolver = app.resolver()?;
    let filter = app.config.library.scan_filter();
    let (db, repo) = app.cache().await?;

    println!("Scanning {}...", folder.display());
    let roms = scan_into(&repo, &folder, &filter, &resolver).await.or_raise(|| ErrorKind::Library)?;
    db.close().await;

    let inventory = Inventory::split(roms);
    println!("Scanned {} files", inventory.len());
    println!("Uncompressed ROMs: {}", inventory.uncompressed_totals());
    println!("Compressed ROMs: {}", inventory.compressed_totals());
    Ok(())
}
