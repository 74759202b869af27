use super::App;
use crate::error::{ErrorKind, Result};
use clap::{Args, Subcommand};
use exn::ResultExt;
use romc_cache::Repository;
use romc_library::refresh;
use romc_platform::Resolver;
use romc_queue::Action;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Queue files for processing
    Add {
        /// `compress` or `uncompress`; defaults to whichever changes the
        /// file's current state
        #[arg(long, value_parser = parse_action)]
        action: Option<Action>,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Take files off the queue
    Remove {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show the queue in run order
    Show,
    /// Empty the queue
    Clear,
}

pub(crate) fn parse_action(value: &str) -> std::result::Result<Action, String> {
    value.parse::<Action>().map_err(|e| (*e).to_string())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).or_raise(|| ErrorKind::InvalidArgument(path.display().to_string()))
}

async fn add(repo: &Repository, resolver: &Resolver, action: Option<Action>, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let path = absolute(path)?;
        let rom = match repo.get_by_path(&path).await.or_raise(|| ErrorKind::Cache)? {
            Some(row) => row.rom,
            // Not scanned yet; pick it up now.
            None => match refresh(&path, resolver).or_raise(|| ErrorKind::Library)? {
                Some(rom) => {
                    repo.insert(std::slice::from_ref(&rom)).await.or_raise(|| ErrorKind::Cache)?;
                    rom
                },
                None => {
                    println!("File not found: {}", path.display());
                    continue;
                },
            },
        };
        let action = action.unwrap_or(if rom.is_compressed() { Action::Uncompress } else { Action::Compress });
        repo.set_action(&path, Some(action.as_str())).await.or_raise(|| ErrorKind::Cache)?;
        println!("Queued {action}: {} ({})", rom.file_name, rom.platform);
    }
    Ok(())
}

pub async fn execute(app: &App, args: QueueArgs) -> Result<()> {
    let (db, repo) = app.cache().await?;
    match args.command {
        QueueCommand::Add { action, paths } => add(&repo, &app.resolver()?, action, &paths).await?,
        QueueCommand::Remove { paths } => {
            for path in &paths {
                let path = absolute(path)?;
                if repo.set_action(&path, None).await.or_raise(|| ErrorKind::Cache)? {
                    println!("Removed from queue: {}", path.display());
                } else {
                    println!("Not in the library: {}", path.display());
                }
            }
        },
        QueueCommand::Show => {
            let queued = repo.queued().await.or_raise(|| ErrorKind::Cache)?;
            if queued.is_empty() {
                println!("Queue is empty.");
            }
            for row in queued {
                let action = row.action.unwrap_or_default();
                println!("{action:<10} {:<36} {}", row.rom.platform, row.rom.path.display());
            }
        },
        QueueCommand::Clear => {
            let cleared = repo.clear_actions().await.or_raise(|| ErrorKind::Cache)?;
            println!("Cleared {cleared} queued items");
        },
    }
    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use romc_cache::Database;
    use tempfile::TempDir;

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("Compress").unwrap(), Action::Compress);
        assert!(parse_action("shrink").unwrap_err().contains("shrink"));
    }

    #[tokio::test]
    async fn test_add_infers_action_and_picks_up_unscanned_files() {
        let dir = TempDir::new().unwrap();
        let iso = dir.path().join("ps2").join("Okami.iso");
        let chd = dir.path().join("ps2").join("Shadow.chd");
        std::fs::create_dir_all(iso.parent().unwrap()).unwrap();
        std::fs::write(&iso, b"iso").unwrap();
        std::fs::write(&chd, b"chd").unwrap();
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);

        let missing = dir.path().join("gone.iso");
        add(&repo, &Resolver::default(), None, &[iso.clone(), chd.clone(), missing.clone()]).await.unwrap();

        let queued = repo.queued().await.unwrap();
        let actions: Vec<_> = queued.iter().map(|r| (r.rom.path.clone(), r.action.clone().unwrap())).collect();
        assert_eq!(actions, vec![(iso, "Compress".to_string()), (chd, "Uncompress".to_string())]);
        assert_eq!(queued[0].rom.platform, "Sony Playstation 2");
        assert!(repo.get_by_path(&missing).await.unwrap().is_none());
    }
}
