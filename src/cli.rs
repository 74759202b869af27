use crate::commands::{list, queue, resolve, run, scan};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Classify a ROM library and run compression queues.
#[derive(Debug, Parser)]
#[command(name = "romc", version, about)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON), layered over the user's.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging, and show the exact tool invocations.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a library folder and replace the cache with the result
    Scan(scan::ScanArgs),
    /// List the cached inventory
    List(list::ListArgs),
    /// Show which platform and container a path resolves to
    Resolve(resolve::ResolveArgs),
    /// Edit the work queue
    Queue(queue::QueueArgs),
    /// Run the work queue
    Run(run::RunArgs),
    /// Process a JSON queue file with chdman
    Chd(BatchArgs),
    /// Process a JSON queue file with nsz
    Nsz(BatchArgs),
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON array of `{action, platform, path}` objects
    pub queue_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use romc_queue::Action;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["romc", "list", "--compressed", "-v", "--config", "/etc/romc.yaml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/romc.yaml")));
        assert!(matches!(cli.command, Command::List(ref args) if args.compressed));
    }

    #[test]
    fn test_queue_add_parses_action() {
        let cli = Cli::try_parse_from(["romc", "queue", "add", "--action", "uncompress", "/roms/a.chd"]).unwrap();
        let Command::Queue(queue::QueueArgs { command: queue::QueueCommand::Add { action, paths } }) = cli.command else {
            panic!("expected queue add");
        };
        assert_eq!(action, Some(Action::Uncompress));
        assert_eq!(paths, vec![PathBuf::from("/roms/a.chd")]);
    }

    #[test]
    fn test_list_state_flags_conflict() {
        assert!(Cli::try_parse_from(["romc", "list", "--compressed", "--uncompressed"]).is_err());
    }

    #[test]
    fn test_batch_requires_file() {
        assert!(Cli::try_parse_from(["romc", "chd"]).is_err());
        assert!(Cli::try_parse_from(["romc", "nsz", "queue.json"]).is_ok());
    }
}
