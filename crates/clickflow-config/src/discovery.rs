//! Config file discovery and layered merging.
//!
//! Layers, lowest precedence first:
//! 1. `<config dir>/config.toml`, where the config dir is `CLICKFLOW_CONFIG_DIR`
//!    or the platform config dir
//! 2. `./clickflow.toml` in the project directory
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use crate::{ClickflowConfig, ConfigError, Result};

const PROJECT_CONFIG_FILE: &str = "clickflow.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "clickflow";

/// Overrides the user config directory; empty means unset.
const CONFIG_DIR_ENV: &str = "CLICKFLOW_CONFIG_DIR";

/// Commented starter config written by `config init`.
pub const CONFIG_TEMPLATE: &str = r#"# Clickflow Configuration

[engine]
# Pause after each action, in milliseconds
pacing_ms = 300
# "lenient" skips malformed set-storage parameters silently,
# "strict" reports them after the run
storage_mode = "lenient"

# [paths]
# data_dir = "/path/to/clickflow-data"

[logging]
# Daily-rolling JSON log next to the user config
file = true
"#;

/// One config layer that was looked for.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Found and parsed.
    pub loaded: bool,
}

/// Merged configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClickflowConfig,
    /// Every layer checked, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Unreadable layers and suspicious settings.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the layers that contributed to `config`.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Discover and merge the user and project layers.
///
/// `project_dir` defaults to the current directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_layers(user_config_path(None), project_dir)
}

/// Like [`load_config`], reading the user layer from `config_dir` instead.
pub fn load_config_from(config_dir: &Path, project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_layers(user_config_path(Some(config_dir)), project_dir)
}

fn load_layers(user: Option<PathBuf>, project_dir: Option<&Path>) -> Result<LoadedConfig> {
    let project = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    let mut loaded = LoadedConfig {
        config: ClickflowConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };

    for path in user.into_iter().chain(std::iter::once(project)) {
        let layer = match path.is_file().then(|| read_layer(&path)) {
            Some(Ok(layer)) => Some(layer),
            Some(Err(e)) => {
                loaded
                    .warnings
                    .push(format!("Failed to load {}: {}", path.display(), e));
                None
            }
            None => None,
        };
        let found = layer.is_some();
        if let Some(layer) = layer {
            loaded.config.merge(layer);
        }
        loaded.sources.push(ConfigSource {
            path,
            loaded: found,
        });
    }

    if loaded.config.engine.as_ref().is_some_and(|e| e.pacing_ms == 0) {
        loaded.warnings.push(
            "[engine] pacing_ms = 0 disables the pause between actions; \
             effects will not be visible one by one."
                .to_string(),
        );
    }

    Ok(loaded)
}

fn read_layer(path: &Path) -> Result<ClickflowConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    ClickflowConfig::from_toml(&contents)
}

/// Write [`CONFIG_TEMPLATE`] to `path`, creating parent directories.
///
/// Returns `false` without touching anything if the file already exists.
pub fn write_template(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, CONFIG_TEMPLATE).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(true)
}

/// The user config file, if a config directory can be determined.
pub fn xdg_config_path() -> Option<PathBuf> {
    user_config_path(None)
}

fn user_config_path(config_dir: Option<&Path>) -> Option<PathBuf> {
    match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE)),
    }
}

/// The user config directory: `CLICKFLOW_CONFIG_DIR`, else the platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::StorageMode;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_xdg_config_path_exists() {
        // May be None in some CI environments
        if let Some(p) = xdg_config_path() {
            assert!(p.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_read_layer_errors() {
        let err = read_layer(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));

        let dir = TempDir::new().unwrap();
        write(dir.path(), "config.toml", "this is not valid toml {{{{");
        let err = read_layer(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_project_only() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        write(dir.path(), "clickflow.toml", "[engine]\npacing_ms = 25\n");

        let loaded = load_config_from(empty_config_dir.path(), Some(dir.path())).unwrap();
        assert_eq!(loaded.config.engine().pacing_ms, 25);
        let project = dir.path().join("clickflow.toml");
        assert_eq!(loaded.loaded_from(), vec![project.as_path()]);
        assert_eq!(loaded.sources.len(), 2);
        assert!(!loaded.sources[0].loaded);
    }

    #[test]
    fn test_load_config_no_files() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        let loaded = load_config_from(empty_config_dir.path(), Some(dir.path())).unwrap();
        assert!(loaded.config.engine.is_none());
        assert!(loaded.loaded_from().is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_load_config_layered_merge() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        write(
            user_dir.path(),
            "config.toml",
            "[engine]\npacing_ms = 300\nstorage_mode = \"strict\"\n\n[logging]\nfile = false\n",
        );
        write(project_dir.path(), "clickflow.toml", "[engine]\npacing_ms = 100\n");

        let loaded = load_config_from(user_dir.path(), Some(project_dir.path())).unwrap();

        // Project-local replaces the whole [engine] section
        let engine = loaded.config.engine();
        assert_eq!(engine.pacing_ms, 100);
        assert_eq!(engine.storage_mode, StorageMode::Lenient);

        // User-level [logging] survives
        assert!(!loaded.config.logging().file);
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_zero_pacing_warning() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        write(dir.path(), "clickflow.toml", "[engine]\npacing_ms = 0\n");

        let loaded = load_config_from(empty_config_dir.path(), Some(dir.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("pacing_ms"));
    }

    #[test]
    fn test_malformed_config_warns_but_continues() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        write(dir.path(), "clickflow.toml", "not valid toml {{{{");

        let loaded = load_config_from(empty_config_dir.path(), Some(dir.path())).unwrap();
        assert!(loaded.warnings[0].contains("Failed to load"));
        assert!(loaded.loaded_from().is_empty());
    }

    #[test]
    fn test_write_template_parses_and_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(write_template(&path).unwrap());
        let config = read_layer(&path).unwrap();
        assert_eq!(config.engine().pacing_ms, 300);
        assert_eq!(config.engine().storage_mode, StorageMode::Lenient);
        assert!(config.logging().file);

        fs::write(&path, "[engine]\npacing_ms = 7\n").unwrap();
        assert!(!write_template(&path).unwrap());
        assert_eq!(read_layer(&path).unwrap().engine().pacing_ms, 7);
    }
}
