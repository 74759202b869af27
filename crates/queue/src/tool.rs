use crate::error::{ErrorKind, Result};
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

/// An external codec binary, found on demand.
///
/// Lookup order: the configured path (if any), then next to the running
/// executable (`<dir>/<name>/<name>` and `<dir>/<name>`), then `PATH`.
/// Lookup happens each time a job needs the tool, so installing it while a
/// queue is running takes effect for the next item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    name: &'static str,
    configured: Option<PathBuf>,
}

impl Tool {
    pub fn new(name: &'static str, configured: Option<PathBuf>) -> Self {
        Self { name, configured }
    }

    /// The disc codec.
    pub fn chdman(configured: Option<PathBuf>) -> Self {
        Self::new("chdman", configured)
    }

    /// The cartridge codec.
    pub fn nsz(configured: Option<PathBuf>) -> Self {
        Self::new("nsz", configured)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(configured) = &self.configured {
            if configured.is_file() {
                return Ok(configured.clone());
            }
            tracing::warn!(tool = self.name, path = %configured.display(), "Configured tool does not exist");
            exn::bail!(ErrorKind::ToolNotFound(self.name));
        }
        let bundled = std::env::current_exe().ok().and_then(|exe| exe.parent().and_then(|dir| self.bundled(dir)));
        if let Some(path) = bundled {
            return Ok(path);
        }
        match which::which(self.name) {
            Ok(path) => Ok(path),
            Err(e) => {
                tracing::debug!(tool = self.name, error = %e, "Tool not found on PATH");
                exn::bail!(ErrorKind::ToolNotFound(self.name))
            },
        }
    }

    fn bundled(&self, dir: &Path) -> Option<PathBuf> {
        let file = format!("{}{EXE_SUFFIX}", self.name);
        [dir.join(self.name).join(&file), dir.join(&file)].into_iter().find(|p| p.is_file())
    }
}
