use super::App;
use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use romc_cache::CachedRom;
use romc_library::{Inventory, Totals};
use romc_storage::parse_size;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only compressed files
    #[arg(long, conflicts_with = "uncompressed")]
    pub compressed: bool,
    /// Only uncompressed files
    #[arg(long)]
    pub uncompressed: bool,
    /// Only files resolved to this platform (case-insensitive)
    #[arg(long)]
    pub platform: Option<String>,
    /// Only files larger than this, e.g. `700MB` or `1.5 GB`
    #[arg(long, value_name = "SIZE")]
    pub larger_than: Option<String>,
    /// Comma-separated terms; every term must appear in the name, platform
    /// or path
    #[arg(long)]
    pub search: Option<String>,
}

/// Row filter built from [`ListArgs`].
#[derive(Debug, Default)]
struct Filter {
    platform: Option<String>,
    min_size: Option<u64>,
    terms: Vec<String>,
}

impl Filter {
    fn new(args: &ListArgs) -> Result<Self> {
        let min_size = match &args.larger_than {
            Some(size) => Some(parse_size(size).or_raise(|| ErrorKind::InvalidArgument(format!("--larger-than {size}")))?),
            None => None,
        };
        let terms = args
            .search
            .iter()
            .flat_map(|s| s.split(','))
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(Self { platform: args.platform.clone(), min_size, terms })
    }

    fn keeps(&self, row: &CachedRom) -> bool {
        let rom = &row.rom;
        if self.platform.as_ref().is_some_and(|p| !rom.platform.eq_ignore_ascii_case(p)) {
            return false;
        }
        if self.min_size.is_some_and(|min| rom.size <= min) {
            return false;
        }
        let haystack = [rom.file_name.to_lowercase(), rom.platform.to_lowercase(), rom.path.to_string_lossy().to_lowercase()];
        self.terms.iter().all(|term| haystack.iter().any(|h| h.contains(term)))
    }
}

fn print_section(title: &str, totals: Totals, rows: &[&CachedRom]) {
    println!("{title}: {totals}");
    for row in rows {
        let rom = &row.rom;
        let size = if rom.path.exists() { rom.human_size() } else { "(missing)".to_string() };
        let action = row.action.as_deref().map(|a| format!("  [{a}]")).unwrap_or_default();
        println!("  {:<36} {:>10}  {}{action}", rom.platform, size, rom.path.display());
    }
}

pub async fn execute(app: &App, args: ListArgs) -> Result<()> {
    let filter = Filter::new(&args)?;
    let (db, repo) = app.cache().await?;
    let rows = repo.get_all().await.or_raise(|| ErrorKind::Cache)?;
    db.close().await;

    let rows: Vec<&CachedRom> = rows.iter().filter(|r| filter.keeps(r)).collect();
    let (compressed, uncompressed): (Vec<&CachedRom>, Vec<&CachedRom>) =
        rows.iter().copied().partition(|r| r.rom.is_compressed());
    let inventory = Inventory::split(rows.iter().map(|r| r.rom.clone()));
    if !args.compressed {
        print_section("Uncompressed ROMs", inventory.uncompressed_totals(), &uncompressed);
    }
    if !args.uncompressed {
        print_section("Compressed ROMs", inventory.compressed_totals(), &compressed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use romc_storage::RomFile;
    use rstest::rstest;
    use time::UtcDateTime;

    fn row(path: &str, platform: &str, size: u64) -> CachedRom {
        CachedRom { id: 1, rom: RomFile::new(path, platform, size), action: None, scanned_at: UtcDateTime::UNIX_EPOCH }
    }

    fn args(platform: Option<&str>, larger_than: Option<&str>, search: Option<&str>) -> ListArgs {
        ListArgs {
            compressed: false,
            uncompressed: false,
            platform: platform.map(String::from),
            larger_than: larger_than.map(String::from),
            search: search.map(String::from),
        }
    }

    #[rstest]
    #[case(args(None, None, None), true)]
    #[case(args(Some("sony playstation 2"), None, None), true)]
    #[case(args(Some("Sony Playstation"), None, None), false)]
    #[case(args(None, Some("1 GB"), None), true)]
    #[case(args(None, Some("2GB"), None), false)]
    #[case(args(None, None, Some("okami, ps2")), true)]
    #[case(args(None, None, Some("okami,  ,playstation 2")), true)]
    #[case(args(None, None, Some("okami,gamecube")), false)]
    fn test_filter(#[case] args: ListArgs, #[case] kept: bool) {
        let rom = row("/roms/ps2/Okami.iso", "Sony Playstation 2", 1_500_000_000);
        assert_eq!(Filter::new(&args).unwrap().keeps(&rom), kept);
    }

    #[test]
    fn test_filter_rejects_bad_size() {
        assert!(Filter::new(&args(None, Some("lots"), None)).is_err());
    }
}
