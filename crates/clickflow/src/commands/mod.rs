//! CLI command handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clickflow_config::{ClickflowConfig, STORAGE_FILE, StorageMode, WORKFLOW_FILE};
use clickflow_workflow::{
    DocumentStore, EngineConfig, JsonFileDocumentStore, JsonFileKeyValueStore, WorkflowDocument,
};

pub mod actions;
pub mod config;
pub mod edit;
pub mod run;
pub mod show;
pub mod storage;

/// Command-line values that take precedence over the config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub strict_storage: bool,
    pub pacing_ms: Option<u64>,
}

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding `workflow.json` and `storage.json`.
    pub data_dir: PathBuf,
    /// Engine settings after applying overrides.
    pub engine: EngineConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Resolve the context from loaded config plus command-line overrides.
    pub fn new(
        config: &ClickflowConfig,
        overrides: Overrides,
        json_output: bool,
        verbose: bool,
    ) -> Self {
        let data_dir = overrides
            .data_dir
            .unwrap_or_else(|| config.paths().effective_data_dir());

        let mut engine = EngineConfig::from_section(&config.engine());
        if let Some(ms) = overrides.pacing_ms {
            engine.pacing = Duration::from_millis(ms);
        }
        if overrides.strict_storage {
            engine.storage_mode = StorageMode::Strict;
        }

        Self {
            data_dir,
            engine,
            json_output,
            verbose,
        }
    }

    pub fn workflow_path(&self) -> PathBuf {
        self.data_dir.join(WORKFLOW_FILE)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub fn document_store(&self) -> JsonFileDocumentStore {
        JsonFileDocumentStore::new(self.workflow_path())
    }

    /// The saved document, or `None` when nothing was saved yet.
    pub fn load_document(&self) -> Result<Option<WorkflowDocument>> {
        self.document_store()
            .load_document()
            .with_context(|| format!("Failed to load {}", self.workflow_path().display()))
    }

    /// The saved document, or an empty one to start editing from.
    pub fn load_or_default(&self) -> Result<WorkflowDocument> {
        Ok(self.load_document()?.unwrap_or_default())
    }

    pub fn save_document(&self, document: &WorkflowDocument) -> Result<()> {
        self.document_store()
            .save_document(document)
            .with_context(|| format!("Failed to save {}", self.workflow_path().display()))
    }

    pub fn open_storage(&self) -> Result<JsonFileKeyValueStore> {
        JsonFileKeyValueStore::open(self.storage_path())
            .with_context(|| format!("Failed to open {}", self.storage_path().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_config() {
        let config = ClickflowConfig::from_toml(
            r#"
[engine]
pacing_ms = 50
storage_mode = "lenient"

[paths]
data_dir = "/from/config"
"#,
        )
        .unwrap();

        let ctx = Context::new(
            &config,
            Overrides {
                data_dir: Some(PathBuf::from("/from/flag")),
                strict_storage: true,
                pacing_ms: Some(0),
            },
            false,
            false,
        );
        assert_eq!(ctx.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(ctx.engine.pacing, Duration::ZERO);
        assert_eq!(ctx.engine.storage_mode, StorageMode::Strict);
        assert_eq!(ctx.workflow_path(), PathBuf::from("/from/flag/workflow.json"));
    }

    #[test]
    fn test_config_used_without_overrides() {
        let config = ClickflowConfig::from_toml(
            r#"
[engine]
pacing_ms = 50
storage_mode = "strict"
"#,
        )
        .unwrap();

        let ctx = Context::new(
            &config,
            Overrides {
                data_dir: Some(PathBuf::from("/d")),
                ..Default::default()
            },
            true,
            false,
        );
        assert_eq!(ctx.engine.pacing, Duration::from_millis(50));
        assert_eq!(ctx.engine.storage_mode, StorageMode::Strict);
        assert_eq!(ctx.storage_path(), PathBuf::from("/d/storage.json"));
    }
}
