//! Workflow document model.
//!
//! A document binds an ordered list of action instances to one trigger label.
//! Order is execution order. The persisted shape is kept compatible with the
//! editor's saved form:
//!
//! ```json
//! {
//!   "buttonLabel": "Greet",
//!   "actions": [
//!     { "id": "showText-1", "type": "showText", "label": "Show Text", "param": "hello" },
//!     { "id": "disableButton-2", "type": "disableButton", "label": "Disable Button", "param": null }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, ActionKind};

/// A configured action inside a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInstance {
    /// Identity that survives reorders; unique within a document.
    #[serde(rename = "id")]
    pub instance_id: String,

    /// Catalog id of the action. Kept as a string so documents naming kinds
    /// this build does not know still load (the engine skips them).
    #[serde(rename = "type")]
    pub kind: String,

    /// Label copied from the catalog when the instance was created.
    #[serde(rename = "label")]
    pub display_label: String,

    /// Parameter; present iff the catalog entry took one at creation time.
    #[serde(default)]
    pub param: Option<String>,
}

impl ActionInstance {
    /// Resolve the kind against the catalog.
    pub fn action_kind(&self) -> Option<ActionKind> {
        catalog::lookup(&self.kind).map(|def| def.kind)
    }

    /// Parameter, with a missing one read as the empty string.
    pub fn param_or_empty(&self) -> &str {
        self.param.as_deref().unwrap_or("")
    }

    /// Parameter if present and non-empty.
    pub fn non_empty_param(&self) -> Option<&str> {
        self.param.as_deref().filter(|p| !p.is_empty())
    }
}

/// A trigger label plus the ordered actions it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    /// Text shown on the trigger. May be empty.
    #[serde(rename = "buttonLabel", default)]
    pub trigger_label: String,

    /// Actions in execution order.
    #[serde(default)]
    pub actions: Vec<ActionInstance>,
}

impl WorkflowDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the document has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// A document can be run only when it has at least one action.
    pub fn is_runnable(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Whether an instance with this id already exists.
    pub fn contains_id(&self, instance_id: &str) -> bool {
        self.actions.iter().any(|a| a.instance_id == instance_id)
    }

    /// Ids that occur more than once. Empty for any document built through
    /// the builder; non-empty only for hand-edited or corrupted files.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for action in &self.actions {
            let id = action.instance_id.as_str();
            if !seen.insert(id) && !dupes.contains(&id) {
                dupes.push(id);
            }
        }
        dupes
    }

    /// Numbered, human-readable preview of the action sequence.
    ///
    /// `1. Show Text → "hello"`; the arrow part is omitted when there is no
    /// parameter.
    pub fn preview_lines(&self) -> Vec<String> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| match action.non_empty_param() {
                Some(param) => format!("{}. {} → \"{}\"", i + 1, action.display_label, param),
                None => format!("{}. {}", i + 1, action.display_label),
            })
            .collect()
    }

    /// Parse a document from its persisted JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(id: &str, kind: &str, label: &str, param: Option<&str>) -> ActionInstance {
        ActionInstance {
            instance_id: id.into(),
            kind: kind.into(),
            display_label: label.into(),
            param: param.map(Into::into),
        }
    }

    #[test]
    fn test_new_document_not_runnable() {
        let doc = WorkflowDocument::new();
        assert!(doc.is_empty());
        assert!(!doc.is_runnable());
        assert_eq!(doc.trigger_label, "");
    }

    #[test]
    fn test_parse_persisted_shape() {
        let json = r#"{
            "buttonLabel": "Go",
            "actions": [
                {"id": "showText-1717", "type": "showText", "label": "Show Text", "param": "hi"},
                {"id": "refreshPage-1718", "type": "refreshPage", "label": "Refresh Page", "param": null}
            ]
        }"#;
        let doc = WorkflowDocument::from_json(json).unwrap();
        assert_eq!(doc.trigger_label, "Go");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.actions[0].action_kind(), Some(ActionKind::ShowText));
        assert_eq!(doc.actions[0].param.as_deref(), Some("hi"));
        assert_eq!(doc.actions[1].param, None);
    }

    #[test]
    fn test_serialize_keeps_null_param() {
        let doc = WorkflowDocument {
            trigger_label: "x".into(),
            actions: vec![instance("close-1", "closeWindow", "Close Window", None)],
        };
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["buttonLabel"], "x");
        assert_eq!(value["actions"][0]["type"], "closeWindow");
        assert!(value["actions"][0]["param"].is_null());
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = WorkflowDocument::from_json("{}").unwrap();
        assert!(doc.is_empty());

        let doc = WorkflowDocument::from_json(
            r#"{"actions": [{"id": "a", "type": "alert", "label": "Alert"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.actions[0].param, None);
        assert_eq!(doc.actions[0].param_or_empty(), "");
    }

    #[test]
    fn test_unknown_kind_loads() {
        let doc = WorkflowDocument::from_json(
            r#"{"buttonLabel": "", "actions": [{"id": "x-1", "type": "launchRocket", "label": "Launch", "param": null}]}"#,
        )
        .unwrap();
        assert_eq!(doc.actions[0].action_kind(), None);
    }

    #[test]
    fn test_duplicate_ids() {
        let doc = WorkflowDocument {
            trigger_label: String::new(),
            actions: vec![
                instance("a", "alert", "Alert", Some("1")),
                instance("b", "alert", "Alert", Some("2")),
                instance("a", "alert", "Alert", Some("3")),
                instance("a", "alert", "Alert", Some("4")),
            ],
        };
        assert_eq!(doc.duplicate_ids(), vec!["a"]);
        assert!(doc.contains_id("b"));
        assert!(!doc.contains_id("c"));
    }

    #[test]
    fn test_preview_lines() {
        let doc = WorkflowDocument {
            trigger_label: "Go".into(),
            actions: vec![
                instance("1", "showText", "Show Text", Some("hello")),
                instance("2", "changeButtonColor", "Change Button Color", Some("")),
                instance("3", "closeWindow", "Close Window", None),
            ],
        };
        assert_eq!(
            doc.preview_lines(),
            vec![
                "1. Show Text → \"hello\"",
                "2. Change Button Color",
                "3. Close Window",
            ]
        );
    }
}
