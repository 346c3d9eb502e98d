//! Error types for workflow editing and execution.

use thiserror::Error;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that can occur while editing, persisting or running a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The action kind has no catalog entry.
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    /// A remove/move index does not address an existing action.
    #[error("Index {index} out of range for {len} action(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The document is absent or has no actions, so a run cannot start.
    #[error("No actions configured")]
    NoActionsConfigured,

    /// A run is already in flight on this engine.
    #[error("A workflow run is already in progress")]
    RunInProgress,

    /// A set-storage parameter lacks the `key:value` separator.
    #[error("Malformed storage parameter '{0}': expected key:value")]
    MalformedStorageParam(String),

    /// The key-value store or document store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
