//! Persistence collaborators: the saved workflow document and the key-value
//! store that storage actions read and write.
//!
//! File-backed variants keep everything as JSON under one data directory:
//!
//! ```text
//! <data_dir>/
//!   workflow.json   # one WorkflowDocument, editor-compatible shape
//!   storage.json    # flat {"key": "value"} object
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::document::WorkflowDocument;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// Durable slot holding one workflow document.
pub trait DocumentStore: Send + Sync {
    /// The saved document, or `None` if nothing was saved yet.
    fn load_document(&self) -> Result<Option<WorkflowDocument>>;

    /// Replace the saved document.
    fn save_document(&self, document: &WorkflowDocument) -> Result<()>;
}

/// Document store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileDocumentStore {
    path: PathBuf,
}

impl JsonFileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileDocumentStore {
    fn load_document(&self) -> Result<Option<WorkflowDocument>> {
        if !self.path.exists() {
            debug!("No saved workflow at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            WorkflowError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let document = WorkflowDocument::from_json(&content)?;
        debug!(
            "Loaded workflow '{}' with {} action(s)",
            document.trigger_label,
            document.len()
        );
        Ok(Some(document))
    }

    fn save_document(&self, document: &WorkflowDocument) -> Result<()> {
        write_json_file(&self.path, &document.to_json()?)?;
        debug!(
            "Saved workflow with {} action(s) to {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    slot: Mutex<Option<WorkflowDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load_document(&self) -> Result<Option<WorkflowDocument>> {
        Ok(self.slot.lock().clone())
    }

    fn save_document(&self, document: &WorkflowDocument) -> Result<()> {
        *self.slot.lock() = Some(document.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Key-value store
// ---------------------------------------------------------------------------

/// String key-value store used by the storage actions.
///
/// Not transactional: another writer may change a key between a run's set and
/// a later get.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Key-value store persisted as a flat JSON object.
///
/// The file is read once on open and rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileKeyValueStore {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                WorkflowError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&next)?;
        write_json_file(&self.path, &content)?;
        *entries = next;
        Ok(())
    }
}

fn write_json_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            WorkflowError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    std::fs::write(path, content).map_err(|e| {
        WorkflowError::Storage(format!("Failed to write {}: {}", path.display(), e))
    })
}
