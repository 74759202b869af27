use crate::error::{Error, ErrorKind};
use exn::{OptionExt, ResultExt};
use romc_storage::RomFile;
use std::path::PathBuf;
use time::UtcDateTime;

/// A cached inventory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRom {
    pub id: i64,
    pub rom: RomFile,
    /// Queued action label (`"Compress"`, `"Uncompress"`), if any.
    pub action: Option<String>,
    pub scanned_at: UtcDateTime,
}

#[derive(sqlx::FromRow)]
pub(crate) struct RomRow {
    pub(crate) id: i64,
    pub(crate) file_name: String,
    pub(crate) platform: String,
    pub(crate) path: String,
    pub(crate) size: i64,
    pub(crate) action: Option<String>,
    pub(crate) scanned_at: i64,
}

/// The columns written on insert: everything but `id` and `action`.
pub(crate) struct NewRomRow {
    pub(crate) file_name: String,
    pub(crate) platform: String,
    pub(crate) path: String,
    pub(crate) size: i64,
    pub(crate) scanned_at: i64,
}

impl NewRomRow {
    pub(crate) fn new(rom: &RomFile, scanned_at: UtcDateTime) -> Result<Self, Error> {
        Ok(Self {
            file_name: rom.file_name.clone(),
            platform: rom.platform.clone(),
            path: rom.path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string(),
            size: i64::try_from(rom.size).or_raise(|| ErrorKind::InvalidData("file size"))?,
            scanned_at: scanned_at.unix_timestamp(),
        })
    }
}

impl TryFrom<RomRow> for CachedRom {
    type Error = Error;
    fn try_from(row: RomRow) -> Result<Self, Self::Error> {
        let size = u64::try_from(row.size).or_raise(|| ErrorKind::InvalidData("file size"))?;
        let mut rom = RomFile::new(PathBuf::from(row.path), row.platform, size);
        // The stored name wins over one derived from the path.
        rom.file_name = row.file_name;
        Ok(Self {
            id: row.id,
            rom,
            action: row.action,
            scanned_at: UtcDateTime::from_unix_timestamp(row.scanned_at)
                .or_raise(|| ErrorKind::InvalidData("scan date"))?,
        })
    }
}
