//! Session history configuration from TOML (`[archive]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArchiveConfig {
    /// Keep finished and reset sessions (default: true).
    pub enabled: bool,
    /// Directory for archived sessions (default: `<data dir>/panda-parley/sessions`).
    pub dir: Option<PathBuf>,
}

impl Default for FileArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl FileArchiveConfig {
    /// Directory to use, `None` when archiving is disabled or no data dir exists
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        self.dir
            .clone()
            .or_else(crate::archive::JsonFileArchive::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_has_no_dir() {
        let config = FileArchiveConfig {
            enabled: false,
            dir: Some(PathBuf::from("/tmp/x")),
        };
        assert!(config.resolved_dir().is_none());
    }

    #[test]
    fn test_explicit_dir_wins() {
        let config = FileArchiveConfig {
            dir: Some(PathBuf::from("/tmp/parley")),
            ..Default::default()
        };
        assert_eq!(config.resolved_dir(), Some(PathBuf::from("/tmp/parley")));
    }
}
