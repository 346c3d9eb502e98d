//! Execution state: what a run changes and a display observes.
//!
//! The engine writes through the [`StateSink`] trait. [`ExecutionState`] is the
//! plain value; [`StateHandle`] shares one behind a lock so a display can take
//! snapshots while a run is in progress.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Trigger color before any recolor action.
pub const DEFAULT_TRIGGER_COLOR: &str = "#3498db";

/// Trigger scale before any grow action.
pub const DEFAULT_TRIGGER_SCALE: f64 = 1.0;

/// Scale added by each grow action.
pub const TRIGGER_SCALE_STEP: f64 = 0.2;

/// What a content log entry renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
}

/// One entry of the content log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    /// Text to show, or the image URL.
    pub payload: String,
}

impl ContentItem {
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            payload: payload.into(),
        }
    }

    pub fn image(payload: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Image,
            payload: payload.into(),
        }
    }
}

/// Presentation state mutated by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Append-only within a run.
    pub content_log: Vec<ContentItem>,
    /// Starts at 1.0 and only grows.
    pub trigger_scale: f64,
    pub trigger_color: String,
    /// Starts true; a run can only turn it off.
    pub trigger_enabled: bool,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self {
            content_log: Vec::new(),
            trigger_scale: DEFAULT_TRIGGER_SCALE,
            trigger_color: DEFAULT_TRIGGER_COLOR.to_string(),
            trigger_enabled: true,
        }
    }
}

/// Mutators the engine applies to execution state.
///
/// Within a run the log only grows and the trigger is never re-enabled.
pub trait StateSink {
    /// Restore every field to its default.
    fn reset(&mut self);

    /// Append to the content log.
    fn push_content(&mut self, item: ContentItem);

    /// Increase the trigger scale by `delta`. Non-positive deltas are ignored.
    fn grow_trigger(&mut self, delta: f64);

    /// Replace the trigger color.
    fn set_trigger_color(&mut self, color: String);

    /// Disable the trigger. Idempotent.
    fn disable_trigger(&mut self);
}

impl StateSink for ExecutionState {
    fn reset(&mut self) {
        *self = ExecutionState::default();
    }

    fn push_content(&mut self, item: ContentItem) {
        self.content_log.push(item);
    }

    fn grow_trigger(&mut self, delta: f64) {
        if delta > 0.0 {
            self.trigger_scale += delta;
        }
    }

    fn set_trigger_color(&mut self, color: String) {
        self.trigger_color = color;
    }

    fn disable_trigger(&mut self) {
        self.trigger_enabled = false;
    }
}

/// Shared, lock-protected execution state.
///
/// Cloning the handle shares the same state. Each mutator takes the write lock
/// for that one change only, so a snapshot never observes half of an effect
/// and host interaction (alerts, prompts) never happens under the lock.
#[derive(Debug, Clone, Default)]
pub struct StateHandle {
    inner: Arc<RwLock<ExecutionState>>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ExecutionState {
        self.inner.read().clone()
    }
}

impl StateSink for StateHandle {
    fn reset(&mut self) {
        self.inner.write().reset();
    }

    fn push_content(&mut self, item: ContentItem) {
        self.inner.write().push_content(item);
    }

    fn grow_trigger(&mut self, delta: f64) {
        self.inner.write().grow_trigger(delta);
    }

    fn set_trigger_color(&mut self, color: String) {
        self.inner.write().set_trigger_color(color);
    }

    fn disable_trigger(&mut self) {
        self.inner.write().disable_trigger();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ExecutionState::default();
        assert!(state.content_log.is_empty());
        assert_eq!(state.trigger_scale, 1.0);
        assert_eq!(state.trigger_color, "#3498db");
        assert!(state.trigger_enabled);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = ExecutionState::default();
        state.push_content(ContentItem::text("hi"));
        state.grow_trigger(TRIGGER_SCALE_STEP);
        state.set_trigger_color("#000000".into());
        state.disable_trigger();

        state.reset();
        assert_eq!(state, ExecutionState::default());
    }

    #[test]
    fn test_grow_only_increases() {
        let mut state = ExecutionState::default();
        state.grow_trigger(-1.0);
        state.grow_trigger(0.0);
        assert_eq!(state.trigger_scale, 1.0);
        state.grow_trigger(0.5);
        assert!((state.trigger_scale - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_disable_idempotent() {
        let mut state = ExecutionState::default();
        state.disable_trigger();
        state.disable_trigger();
        assert!(!state.trigger_enabled);
    }

    #[test]
    fn test_handle_shares_state() {
        let mut handle = StateHandle::new();
        let observer = handle.clone();
        handle.push_content(ContentItem::image("http://img"));
        handle.disable_trigger();

        let snapshot = observer.snapshot();
        assert_eq!(snapshot.content_log, vec![ContentItem::image("http://img")]);
        assert!(!snapshot.trigger_enabled);
    }

    #[test]
    fn test_content_item_serializes_lowercase_kind() {
        let json = serde_json::to_value(ContentItem::text("x")).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["payload"], "x");
    }
}
