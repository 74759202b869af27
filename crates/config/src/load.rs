use crate::app::AppConfig;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ROMC_";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", "romc", "romc")
}

/// The user's configuration directory, if the platform has one.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Where the cache database and queue snapshot live by default. Falls back to
/// the working directory when there is no home directory.
pub fn data_dir() -> PathBuf {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf()).unwrap_or_else(|| PathBuf::from("."))
}

/// Builds an [`AppConfig`] from its layers.
#[derive(Debug, Clone)]
pub struct Loader {
    config_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    env: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self { config_dir: config_dir(), file: None, env: true }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for `config.{yaml,toml,json}` in `dir` instead of the user's
    /// configuration directory. `None` skips that layer.
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    /// An explicit configuration file, layered over the directory's.
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn with_env(mut self, env: bool) -> Self {
        self.env = env;
        self
    }

    fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(dir) = &self.config_dir {
            figment = figment
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Json::file(dir.join("config.json")));
        }
        if let Some(file) = &self.file {
            if !file.is_file() {
                exn::bail!(ErrorKind::NotFound(file.clone()));
            }
            figment = match extension(file).as_deref() {
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("toml") => figment.merge(Toml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file.clone())),
            };
        }
        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        Ok(figment)
    }

    #[instrument("loading configuration", skip(self), fields(file = ?self.file))]
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self.figment()?.extract().or_raise(|| ErrorKind::Load)?;
        let config = config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}
