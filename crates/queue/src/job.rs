use crate::error::{ErrorKind, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// What to do to a file.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Compress,
    Uncompress,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compress => "Compress",
            Self::Uncompress => "Uncompress",
        }
    }
}

impl FromStr for Action {
    type Err = crate::error::Error;
    /// Case-insensitive, so that `compress` works on the command line.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compress" => Ok(Self::Compress),
            "uncompress" | "decompress" => Ok(Self::Uncompress),
            _ => exn::bail!(ErrorKind::InvalidAction(s.to_string())),
        }
    }
}

/// One requested action on one file.
///
/// The `platform` is the key into the [`DispatchTable`](crate::DispatchTable)
/// and is matched exactly, so it should be a label produced by the platform
/// resolver. Jobs are never modified once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub action: Action,
    pub platform: String,
    pub path: PathBuf,
}

impl Job {
    pub fn new(action: Action, platform: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { action, platform: platform.into(), path: path.into() }
    }

    /// The file name, for display.
    pub fn name(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }

    /// The lowercase extension including its dot, or `""`.
    pub(crate) fn extension(&self) -> String {
        self.path.extension().map(|e| format!(".{}", e.to_string_lossy().to_lowercase())).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Compress", Action::Compress)]
    #[case("compress", Action::Compress)]
    #[case(" UNCOMPRESS ", Action::Uncompress)]
    #[case("decompress", Action::Uncompress)]
    fn test_action_from_str(#[case] input: &str, #[case] expected: Action) {
        assert_eq!(input.parse::<Action>().unwrap(), expected);
    }

    #[test]
    fn test_action_rejects_others() {
        let err = "Delete".parse::<Action>().unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidAction(ref a) if a == "Delete"));
    }

    #[test]
    fn test_job_serializes_with_capitalized_action() {
        let job = Job::new(Action::Uncompress, "Sony Playstation 2", "/roms/ps2/Okami.chd");
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "Uncompress", "platform": "Sony Playstation 2", "path": "/roms/ps2/Okami.chd"})
        );
        assert_eq!(serde_json::from_value::<Job>(json).unwrap(), job);
    }

    #[test]
    fn test_job_rejects_unknown_action() {
        let json = serde_json::json!({"action": "compress", "platform": "Arcade", "path": "/a.zip"});
        assert!(serde_json::from_value::<Job>(json).is_err());
    }

    #[test]
    fn test_name_and_extension() {
        let job = Job::new(Action::Compress, "Sony Playstation 2", "/roms/ps2/Game.BIN");
        assert_eq!(job.name(), "Game.BIN");
        assert_eq!(job.extension(), ".bin");
        assert_eq!(Job::new(Action::Compress, "Arcade", "/roms/noext").extension(), "");
    }
}
