//! Path management configuration.
//!
//! Controls where the saved workflow document and the key-value store live.
//!
//! # Configuration
//!
//! ```toml
//! [paths]
//! data_dir = "~/.local/share/clickflow"
//! ```
//!
//! # Environment Variables
//!
//! - `CLICKFLOW_DATA_DIR` - Override the data directory

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CLICKFLOW_DATA_DIR";

/// File name of the persisted workflow document inside the data directory.
pub const WORKFLOW_FILE: &str = "workflow.json";

/// File name of the key-value store inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

/// Path management configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Directory holding `workflow.json` and `storage.json`.
    /// Default: `<platform data dir>/clickflow`
    ///
    /// Can be overridden by the `CLICKFLOW_DATA_DIR` environment variable.
    pub data_dir: Option<PathBuf>,
}

impl PathsSection {
    /// Get the effective data directory, checking the environment variable first.
    ///
    /// Resolution order:
    /// 1. `CLICKFLOW_DATA_DIR` environment variable
    /// 2. Configured `data_dir` value
    /// 3. Default: `<platform data dir>/clickflow`, or `./.clickflow` without one
    pub fn effective_data_dir(&self) -> PathBuf {
        let from_env = std::env::var(DATA_DIR_ENV).ok();
        self.resolve_data_dir(from_env.as_deref())
    }

    fn resolve_data_dir(&self, from_env: Option<&str>) -> PathBuf {
        if let Some(dir) = from_env
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }

        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("clickflow"))
                .unwrap_or_else(|| PathBuf::from(".clickflow"))
        })
    }

    /// Path of the persisted workflow document.
    pub fn workflow_path(&self) -> PathBuf {
        self.effective_data_dir().join(WORKFLOW_FILE)
    }

    /// Path of the key-value store file.
    pub fn storage_path(&self) -> PathBuf {
        self.effective_data_dir().join(STORAGE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_defaults() {
        let config = PathsSection::default();
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_resolve_default() {
        let config = PathsSection::default();
        let path = config.resolve_data_dir(None);
        assert!(path.ends_with("clickflow") || path.ends_with(".clickflow"));
    }

    #[test]
    fn test_resolve_configured() {
        let config = PathsSection {
            data_dir: Some(PathBuf::from("/custom/path")),
        };
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("/custom/path"));
    }

    #[test]
    fn test_resolve_env_override() {
        let config = PathsSection {
            data_dir: Some(PathBuf::from("/configured/path")),
        };
        assert_eq!(
            config.resolve_data_dir(Some("/from/env")),
            PathBuf::from("/from/env")
        );
    }

    #[test]
    fn test_resolve_empty_env_ignored() {
        let config = PathsSection {
            data_dir: Some(PathBuf::from("/configured/path")),
        };
        assert_eq!(
            config.resolve_data_dir(Some("")),
            PathBuf::from("/configured/path")
        );
    }

    #[test]
    fn test_file_names() {
        let config = PathsSection {
            data_dir: Some(PathBuf::from("/data")),
        };
        let dir = config.effective_data_dir();
        assert_eq!(config.workflow_path(), dir.join("workflow.json"));
        assert_eq!(config.storage_path(), dir.join("storage.json"));
    }
}
