use crate::error::{ErrorKind, Result};
use crate::load::data_dir;
use romc_storage::{DEFAULT_SYSTEM_EXTENSIONS, ScanFilter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub queue: QueueConfig,
    pub tools: ToolsConfig,
    pub cache: CacheConfig,
    pub platforms: PlatformsConfig,
}

/// Where the ROM library lives and which parts of it a scan skips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub default_folder: Option<PathBuf>,
    pub ignored_folders: Vec<PathBuf>,
    pub ignore_textures: bool,
    pub ignore_system_files: bool,
    pub system_extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            default_folder: None,
            ignored_folders: Vec::new(),
            ignore_textures: true,
            ignore_system_files: true,
            system_extensions: DEFAULT_SYSTEM_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl LibraryConfig {
    pub fn scan_filter(&self) -> ScanFilter {
        let mut filter = ScanFilter::default()
            .with_ignored_folders(&self.ignored_folders)
            .with_system_extensions(&self.system_extensions);
        filter.ignore_textures = self.ignore_textures;
        filter.ignore_system_files = self.ignore_system_files;
        filter
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub delete_original: bool,
    pub verbose: bool,
    /// The durable queue snapshot written before each run.
    pub snapshot: PathBuf,
    /// How long a cancelled tool gets to exit before it is killed.
    pub terminate_grace_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            delete_original: false,
            verbose: false,
            snapshot: data_dir().join("queue.json"),
            terminate_grace_ms: 1000,
        }
    }
}

impl QueueConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }
}

/// Explicit tool locations. Unset tools are looked up next to the executable
/// and then on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub chdman: Option<PathBuf>,
    pub nsz: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub database: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { database: data_dir().join("roms.db") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformsConfig {
    /// Optional platform list file, one `Name|alias,alias` per line, merged
    /// over the built-in list.
    pub list: Option<PathBuf>,
}

impl AppConfig {
    /// Check and normalize a freshly merged configuration.
    pub fn validate(mut self) -> Result<Self> {
        if self.queue.terminate_grace_ms == 0 {
            exn::bail!(ErrorKind::Invalid("queue.terminate_grace_ms must be greater than zero".to_string()));
        }
        let mut extensions = Vec::with_capacity(self.library.system_extensions.len());
        for extension in &self.library.system_extensions {
            let extension = extension.trim().trim_start_matches('.').to_lowercase();
            if extension.is_empty() {
                exn::bail!(ErrorKind::Invalid("library.system_extensions contains an empty entry".to_string()));
            }
            let extension = format!(".{extension}");
            if !extensions.contains(&extension) {
                extensions.push(extension);
            }
        }
        self.library.system_extensions = extensions;
        Ok(self)
    }
}
