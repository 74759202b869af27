//! Repository for cached inventory rows.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{CachedRom, NewRomRow, RomRow};
use exn::{OptionExt, ResultExt};
use romc_storage::RomFile;
use sqlx::SqlitePool;
use std::path::Path;
use time::UtcDateTime;
use tracing::instrument;

/// Reads and writes inventory rows.
///
/// Rows are keyed by absolute path. Re-inserting a path updates the row in
/// place, keeping both its position in insertion order and any queued
/// action.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn sqlx_hates_paths(path: impl AsRef<Path>) -> Result<String> {
        Ok(path.as_ref().to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string())
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert (or refresh) a batch of files in a single transaction.
    ///
    /// Returns the number of rows written.
    #[instrument(skip_all, fields(count = roms.len()))]
    pub async fn insert(&self, roms: &[RomFile]) -> Result<u64> {
        let now = UtcDateTime::now();
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let mut written = 0;
        for rom in roms {
            let row = NewRomRow::new(rom, now)?;
            written += sqlx::query(include_str!("../queries/upsert_rom.sql"))
                .bind(row.file_name)
                .bind(row.platform)
                .bind(row.path)
                .bind(row.size)
                .bind(row.scanned_at)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?
                .rows_affected();
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(written)
    }

    // =========================================================================
    // Get/Fetch
    // =========================================================================

    /// Every cached row, in insertion order.
    pub async fn get_all(&self) -> Result<Vec<CachedRom>> {
        let rows: Vec<RomRow> = sqlx::query_as(include_str!("../queries/get_all.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(CachedRom::try_from).collect()
    }

    pub async fn get_by_path(&self, path: impl AsRef<Path>) -> Result<Option<CachedRom>> {
        let row: Option<RomRow> = sqlx::query_as(include_str!("../queries/get_by_path.sql"))
            .bind(Self::sqlx_hates_paths(path)?)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(CachedRom::try_from).transpose()
    }

    /// Rows with a queued action, in insertion order.
    pub async fn queued(&self) -> Result<Vec<CachedRom>> {
        let rows: Vec<RomRow> = sqlx::query_as(include_str!("../queries/queued.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(CachedRom::try_from).collect()
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Set or clear the queued action for a path. Returns `false` if the path
    /// is not in the cache.
    pub async fn set_action(&self, path: impl AsRef<Path>, action: Option<&str>) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/set_action.sql"))
            .bind(action)
            .bind(Self::sqlx_hates_paths(path)?)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear every queued action. Returns the number of rows that had one.
    pub async fn clear_actions(&self) -> Result<u64> {
        let result = sqlx::query(include_str!("../queries/clear_actions.sql"))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    pub async fn delete_by_path(&self, path: impl AsRef<Path>) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/delete_by_path.sql"))
            .bind(Self::sqlx_hates_paths(path)?)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every row. Returns the number of rows removed.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query(include_str!("../queries/clear.sql"))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tracing::debug!(rows = result.rows_affected(), "Cleared cache");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    fn roms() -> Vec<RomFile> {
        vec![
            RomFile::new("/roms/psx/Crash Bandicoot.cue", "Sony Playstation", 1024),
            RomFile::new("/roms/ps2/Gran Turismo 4.chd", "Sony Playstation 2", 4096),
            RomFile::new("/roms/switch/Zelda.nsp", "Nintendo Switch", 8192),
        ]
    }

    fn paths(rows: &[CachedRom]) -> Vec<&str> {
        rows.iter().map(|r| r.rom.path.to_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_insert_and_get_all_in_order() {
        let repo = repo().await;
        assert_eq!(repo.insert(&roms()).await.unwrap(), 3);
        let all = repo.get_all().await.unwrap();
        assert_eq!(
            paths(&all),
            vec!["/roms/psx/Crash Bandicoot.cue", "/roms/ps2/Gran Turismo 4.chd", "/roms/switch/Zelda.nsp"]
        );
        assert_eq!(all[1].rom.platform, "Sony Playstation 2");
        assert!(all[1].rom.is_compressed());
        assert!(all.iter().all(|r| r.action.is_none()));
    }

    #[tokio::test]
    async fn test_insert_same_path_updates_in_place() {
        let repo = repo().await;
        repo.insert(&roms()).await.unwrap();
        assert!(repo.set_action("/roms/psx/Crash Bandicoot.cue", Some("Compress")).await.unwrap());
        let before = repo.get_by_path("/roms/psx/Crash Bandicoot.cue").await.unwrap().unwrap();

        repo.insert(&[RomFile::new("/roms/psx/Crash Bandicoot.cue", "Sony Playstation", 999)]).await.unwrap();
        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, before.id);
        assert_eq!(all[0].rom.size, 999);
        assert_eq!(all[0].action.as_deref(), Some("Compress"));
    }

    #[tokio::test]
    async fn test_get_by_path_missing() {
        let repo = repo().await;
        assert!(repo.get_by_path("/nope.iso").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_queued_only_returns_actions() {
        let repo = repo().await;
        repo.insert(&roms()).await.unwrap();
        repo.set_action("/roms/switch/Zelda.nsp", Some("Compress")).await.unwrap();
        repo.set_action("/roms/ps2/Gran Turismo 4.chd", Some("Uncompress")).await.unwrap();
        assert!(!repo.set_action("/roms/unknown.iso", Some("Compress")).await.unwrap());

        let queued = repo.queued().await.unwrap();
        assert_eq!(paths(&queued), vec!["/roms/ps2/Gran Turismo 4.chd", "/roms/switch/Zelda.nsp"]);

        repo.set_action("/roms/switch/Zelda.nsp", None).await.unwrap();
        assert_eq!(repo.queued().await.unwrap().len(), 1);
        assert_eq!(repo.clear_actions().await.unwrap(), 1);
        assert!(repo.queued().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let repo = repo().await;
        repo.insert(&roms()).await.unwrap();
        assert!(repo.delete_by_path("/roms/switch/Zelda.nsp").await.unwrap());
        assert!(!repo.delete_by_path("/roms/switch/Zelda.nsp").await.unwrap());
        assert_eq!(repo.clear().await.unwrap(), 2);
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
