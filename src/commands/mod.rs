pub mod batch;
pub mod list;
pub mod queue;
pub mod resolve;
pub mod run;
pub mod scan;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use romc_cache::{Database, Repository};
use romc_config::{AppConfig, Loader};
use romc_platform::{PlatformTable, Resolver};
use romc_queue::{BatchKind, RunOptions, ToolPaths};

/// Everything a command needs besides its own arguments.
pub struct App {
    pub config: AppConfig,
    pub verbose: bool,
}

impl App {
    pub fn resolver(&self) -> Result<Resolver> {
        let table = PlatformTable::default();
        let table = match &self.config.platforms.list {
            Some(list) => {
                let extra = PlatformTable::load(list).or_raise(|| ErrorKind::Platforms(list.clone()))?;
                table.extend(extra.iter().cloned())
            },
            None => table,
        };
        Ok(Resolver::new(table))
    }

    pub async fn cache(&self) -> Result<(Database, Repository)> {
        let db = Database::connect(&self.config.cache.database).await.or_raise(|| ErrorKind::Cache)?;
        let repo = Repository::from(&db);
        Ok((db, repo))
    }

    pub fn tools(&self) -> ToolPaths {
        ToolPaths { chdman: self.config.tools.chdman.clone(), nsz: self.config.tools.nsz.clone() }
    }

    pub fn run_options(&self, delete_original: bool) -> RunOptions {
        RunOptions {
            delete_original: delete_original || self.config.queue.delete_original,
            verbose: self.verbose || self.config.queue.verbose,
            grace: self.config.queue.grace(),
        }
    }
}

pub async fn execute(cli: Cli) -> Result<()> {
    let config = Loader::new().with_file(cli.config).load().or_raise(|| ErrorKind::Config)?;
    let app = App { config, verbose: cli.verbose };
    match cli.command {
        Command::Scan(args) => scan::execute(&app, args).await,
        Command::List(args) => list::execute(&app, args).await,
        Command::Resolve(args) => resolve::execute(&app, args),
        Command::Queue(args) => queue::execute(&app, args).await,
        Command::Run(args) => run::execute(&app, args).await,
        Command::Chd(args) => batch::execute(&app, BatchKind::Disc, args).await,
        Command::Nsz(args) => batch::execute(&app, BatchKind::Cartridge, args).await,
    }
}
