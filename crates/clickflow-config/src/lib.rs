//! Configuration system for the Clickflow workflow runner.
//!
//! Provides TOML-based configuration with:
//! - Engine pacing and set-storage strictness (`[engine]`)
//! - Data directory resolution for the saved workflow and key-value store (`[paths]`)
//! - Log file toggling (`[logging]`)
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod paths;
pub mod types;

pub use discovery::{
    CONFIG_TEMPLATE, ConfigSource, LoadedConfig, load_config, load_config_from, write_template,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use paths::{DATA_DIR_ENV, PathsSection, STORAGE_FILE, WORKFLOW_FILE};
pub use types::*;
