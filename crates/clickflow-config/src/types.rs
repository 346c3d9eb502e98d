//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [engine]                 # pacing + set-storage strictness
//! [paths]                  # where the workflow and key-value store live
//! [logging]                # rolling log file toggle
//! ```

use serde::{Deserialize, Serialize};

use crate::paths::PathsSection;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickflowConfig {
    /// Execution engine configuration.
    pub engine: Option<EngineSection>,

    /// Path management configuration.
    pub paths: Option<PathsSection>,

    /// Log output configuration.
    pub logging: Option<LoggingSection>,
}

impl ClickflowConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: ClickflowConfig) {
        if other.engine.is_some() {
            self.engine = other.engine;
        }

        if other.paths.is_some() {
            self.paths = other.paths;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Engine section, falling back to defaults when absent.
    pub fn engine(&self) -> EngineSection {
        self.engine.clone().unwrap_or_default()
    }

    /// Paths section, falling back to defaults when absent.
    pub fn paths(&self) -> PathsSection {
        self.paths.clone().unwrap_or_default()
    }

    /// Logging section, falling back to defaults when absent.
    pub fn logging(&self) -> LoggingSection {
        self.logging.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Default suspension between two executed actions, in milliseconds.
pub const DEFAULT_PACING_MS: u64 = 300;

/// Execution engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Pause inserted after every executed action.
    /// Default: 300 ms
    pub pacing_ms: u64,

    /// How a `setLocalStorage` action without a `:` separator is treated.
    /// Default: lenient
    pub storage_mode: StorageMode,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            pacing_ms: DEFAULT_PACING_MS,
            storage_mode: StorageMode::default(),
        }
    }
}

/// Handling of malformed `key:value` storage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Skip the action silently (logged at debug level).
    #[default]
    Lenient,
    /// Skip the action and report it as a step diagnostic on the run outcome.
    Strict,
}

impl StorageMode {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Lenient => "lenient",
            StorageMode::Strict => "strict",
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Write a daily-rolling JSON log file next to the user config.
    /// Default: true
    pub file: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { file: true }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClickflowConfig::from_toml("").unwrap();
        assert!(config.engine.is_none());
        assert!(config.paths.is_none());
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_engine_defaults() {
        let engine = ClickflowConfig::new().engine();
        assert_eq!(engine.pacing_ms, 300);
        assert_eq!(engine.storage_mode, StorageMode::Lenient);
        assert!(ClickflowConfig::new().logging().file);
    }

    #[test]
    fn test_parse_engine_section() {
        let toml = r#"
[engine]
pacing_ms = 50
storage_mode = "strict"
"#;
        let config = ClickflowConfig::from_toml(toml).unwrap();
        let engine = config.engine.unwrap();
        assert_eq!(engine.pacing_ms, 50);
        assert_eq!(engine.storage_mode, StorageMode::Strict);
    }

    #[test]
    fn test_partial_engine_section_uses_defaults() {
        let toml = r#"
[engine]
storage_mode = "strict"
"#;
        let config = ClickflowConfig::from_toml(toml).unwrap();
        assert_eq!(config.engine().pacing_ms, DEFAULT_PACING_MS);
    }

    #[test]
    fn test_invalid_storage_mode_rejected() {
        let toml = r#"
[engine]
storage_mode = "paranoid"
"#;
        assert!(ClickflowConfig::from_toml(toml).is_err());
    }

    #[test]
    fn test_merge_override() {
        let mut base = ClickflowConfig::from_toml(
            r#"
[engine]
pacing_ms = 300

[logging]
file = false
"#,
        )
        .unwrap();
        let over = ClickflowConfig::from_toml(
            r#"
[engine]
pacing_ms = 10
"#,
        )
        .unwrap();
        base.merge(over);

        assert_eq!(base.engine().pacing_ms, 10);
        // Sections absent from the override survive
        assert!(!base.logging().file);
    }

    #[test]
    fn test_roundtrip() {
        let toml = r#"
[engine]
pacing_ms = 120
storage_mode = "strict"

[paths]
data_dir = "/tmp/clickflow"
"#;
        let config = ClickflowConfig::from_toml(toml).unwrap();
        let reparsed = ClickflowConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_storage_mode_display() {
        assert_eq!(StorageMode::Lenient.to_string(), "lenient");
        assert_eq!(StorageMode::Strict.to_string(), "strict");
    }
}
