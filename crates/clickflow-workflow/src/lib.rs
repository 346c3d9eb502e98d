//! Workflow documents and the sequential action execution engine for Clickflow.
//!
//! A workflow binds an ordered list of configured actions to a single trigger.
//! This crate provides the document model, the action catalog, the builder that
//! edits documents, and the `WorkflowEngine` that executes them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  WorkflowBuilder ──edits──▶ WorkflowDocument ◀── catalog │
//! │                                   │                      │
//! │                                   ▼                      │
//! │  WorkflowEngine ──drives──▶ WorkflowRun ──▶ StateSink    │
//! │   - pacing + cancellation         │                      │
//! │   - one run at a time             ├──▶ Host              │
//! │                                   └──▶ KeyValueStore     │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod catalog;
pub mod document;
pub mod engine;
pub mod error;
pub mod host;
pub mod run;
pub mod state;
pub mod store;

pub use builder::{IdGenerator, SequentialIds, UuidIds, WorkflowBuilder};
pub use catalog::{ActionDefinition, ActionKind};
pub use document::{ActionInstance, WorkflowDocument};
pub use engine::{EngineConfig, WorkflowEngine};
pub use error::{Result, WorkflowError};
pub use host::{ColorSource, Host, HostEvent, RandomColors, ScriptedHost};
pub use run::{
    RunContext, RunOutcome, RunPhase, RunStatus, StepDiagnostic, StepIssue, StepResult,
    TerminalAction, WorkflowRun, parse_storage_param,
};
pub use state::{ContentItem, ContentKind, ExecutionState, StateHandle, StateSink};
pub use store::{
    DocumentStore, JsonFileDocumentStore, JsonFileKeyValueStore, KeyValueStore,
    MemoryDocumentStore, MemoryKeyValueStore,
};
