//! Action catalog: the closed set of action kinds a workflow can contain.
//!
//! Every entry carries the label copied onto new action instances and, when
//! the action takes a parameter, the prompt an editor shows for it.
//!
//! ```text
//! id                   alias             param
//! alert                alert             Message
//! showText             show-text         Text to display
//! showImage            show-image        Image URL
//! refreshPage          refresh           -
//! setLocalStorage      set-storage       Key:Value (e.g. name:John)
//! getLocalStorage      get-storage       Key to retrieve
//! increaseButtonSize   grow-trigger      -
//! closeWindow          close             -
//! promptAndShow        prompt-and-show   Prompt message
//! changeButtonColor    recolor-trigger   Color (empty for random)
//! disableButton        disable-trigger   -
//! ```

use std::str::FromStr;

use serde::Serialize;

use crate::error::WorkflowError;

/// Symbolic action kind. Each variant selects one effect handler in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ActionKind {
    Alert,
    ShowText,
    ShowImage,
    Refresh,
    SetStorage,
    GetStorage,
    GrowTrigger,
    Close,
    PromptAndShow,
    RecolorTrigger,
    DisableTrigger,
}

impl ActionKind {
    /// Identifier stored in persisted documents.
    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::Alert => "alert",
            ActionKind::ShowText => "showText",
            ActionKind::ShowImage => "showImage",
            ActionKind::Refresh => "refreshPage",
            ActionKind::SetStorage => "setLocalStorage",
            ActionKind::GetStorage => "getLocalStorage",
            ActionKind::GrowTrigger => "increaseButtonSize",
            ActionKind::Close => "closeWindow",
            ActionKind::PromptAndShow => "promptAndShow",
            ActionKind::RecolorTrigger => "changeButtonColor",
            ActionKind::DisableTrigger => "disableButton",
        }
    }

    /// Short kebab-case alias accepted wherever a kind is parsed.
    pub fn alias(&self) -> &'static str {
        match self {
            ActionKind::Alert => "alert",
            ActionKind::ShowText => "show-text",
            ActionKind::ShowImage => "show-image",
            ActionKind::Refresh => "refresh",
            ActionKind::SetStorage => "set-storage",
            ActionKind::GetStorage => "get-storage",
            ActionKind::GrowTrigger => "grow-trigger",
            ActionKind::Close => "close",
            ActionKind::PromptAndShow => "prompt-and-show",
            ActionKind::RecolorTrigger => "recolor-trigger",
            ActionKind::DisableTrigger => "disable-trigger",
        }
    }

    /// Whether executing this kind ends the host context (and the run).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionKind::Refresh | ActionKind::Close)
    }

    /// Catalog definition for this kind.
    pub fn definition(&self) -> &'static ActionDefinition {
        // Every variant has exactly one entry, in declaration order.
        &CATALOG[*self as usize]
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl From<ActionKind> for &'static str {
    fn from(kind: ActionKind) -> Self {
        kind.id()
    }
}

impl FromStr for ActionKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
            .map(|def| def.kind)
            .ok_or_else(|| WorkflowError::UnknownActionKind(s.to_string()))
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    /// The kind this entry describes.
    pub kind: ActionKind,
    /// Label copied onto new instances.
    pub label: &'static str,
    /// Prompt for the parameter; `None` when the action takes no parameter.
    pub param_prompt: Option<&'static str>,
}

impl ActionDefinition {
    /// Whether instances of this action carry a parameter.
    pub fn has_param(&self) -> bool {
        self.param_prompt.is_some()
    }
}

static CATALOG: [ActionDefinition; 11] = [
    ActionDefinition {
        kind: ActionKind::Alert,
        label: "Alert",
        param_prompt: Some("Message"),
    },
    ActionDefinition {
        kind: ActionKind::ShowText,
        label: "Show Text",
        param_prompt: Some("Text to display"),
    },
    ActionDefinition {
        kind: ActionKind::ShowImage,
        label: "Show Image",
        param_prompt: Some("Image URL"),
    },
    ActionDefinition {
        kind: ActionKind::Refresh,
        label: "Refresh Page",
        param_prompt: None,
    },
    ActionDefinition {
        kind: ActionKind::SetStorage,
        label: "Set LocalStorage",
        param_prompt: Some("Key:Value (e.g. name:John)"),
    },
    ActionDefinition {
        kind: ActionKind::GetStorage,
        label: "Get LocalStorage",
        param_prompt: Some("Key to retrieve"),
    },
    ActionDefinition {
        kind: ActionKind::GrowTrigger,
        label: "Increase Button Size",
        param_prompt: None,
    },
    ActionDefinition {
        kind: ActionKind::Close,
        label: "Close Window",
        param_prompt: None,
    },
    ActionDefinition {
        kind: ActionKind::PromptAndShow,
        label: "Prompt and Show",
        param_prompt: Some("Prompt message"),
    },
    ActionDefinition {
        kind: ActionKind::RecolorTrigger,
        label: "Change Button Color",
        param_prompt: Some("Color (empty for random)"),
    },
    ActionDefinition {
        kind: ActionKind::DisableTrigger,
        label: "Disable Button",
        param_prompt: None,
    },
];

/// Look up a catalog entry by persisted id or kebab-case alias.
pub fn lookup(kind: &str) -> Option<&'static ActionDefinition> {
    CATALOG
        .iter()
        .find(|def| def.kind.id() == kind || def.kind.alias() == kind)
}

/// All catalog entries, in catalog order.
pub fn all() -> &'static [ActionDefinition] {
    &CATALOG
}
