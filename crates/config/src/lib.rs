//! User configuration for romc.
//!
//! Layers, lowest priority first:
//!
//! 1. built-in defaults ([`AppConfig::default`]),
//! 2. `config.yaml`, `config.toml` or `config.json` in the user's config
//!    directory,
//! 3. a file passed explicitly (`--config`),
//! 4. `ROMC_*` environment variables, with `__` separating sections
//!    (`ROMC_QUEUE__DELETE_ORIGINAL=true`).

mod app;
pub mod error;
mod load;

pub use crate::app::{AppConfig, CacheConfig, LibraryConfig, PlatformsConfig, QueueConfig, ToolsConfig};
pub use crate::load::{ENV_PREFIX, Loader, config_dir, data_dir};
