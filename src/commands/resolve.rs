use super::App;
use crate::error::Result;
use clap::Args;
use romc_compress::Container;
use romc_platform::UNKNOWN;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Paths to classify; they do not have to exist
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

pub fn execute(app: &App, args: ResolveArgs) -> Result<()> {
    let resolver = app.resolver()?;
    for path in &args.paths {
        let container = Container::from_path(path);
        let state = if container.is_compressed() { format!("compressed, {container}") } else { "uncompressed".to_string() };
        match resolver.best_match(path) {
            Some(m) if app.verbose => {
                println!("{}: {} ({state}) [term `{}`, weight {}]", path.display(), m.platform, m.term, m.weight)
            },
            Some(m) => println!("{}: {} ({state})", path.display(), m.platform),
            None => println!("{}: {UNKNOWN} ({state})", path.display()),
        }
    }
    Ok(())
}
