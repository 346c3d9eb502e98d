//! Workflow builder: snapshot-producing edits on a [`WorkflowDocument`].
//!
//! Every operation takes the current snapshot by reference and returns a new
//! one; the input is never touched, so callers can keep persisting the old
//! snapshot until they adopt the new one. Failed operations leave nothing
//! behind.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::catalog;
use crate::document::{ActionInstance, WorkflowDocument};
use crate::error::{Result, WorkflowError};

/// Generations tried before falling back to a random token.
const MAX_ID_ATTEMPTS: usize = 64;

/// Source of instance id tokens.
///
/// Instance ids must not depend on wall-clock time: two appends in the same
/// tick would collide.
pub trait IdGenerator: Send + Sync {
    /// Produce the next token. Tokens should be unique per generator.
    fn next_token(&self) -> String;
}

/// Monotonic counter starting at 1.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_token(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

/// Random v4 UUID tokens. Unique across processes without coordination.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_token(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Applies edits to workflow documents.
#[derive(Clone)]
pub struct WorkflowBuilder {
    ids: Arc<dyn IdGenerator>,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new(Arc::new(UuidIds))
    }
}

impl WorkflowBuilder {
    /// Create a builder drawing instance ids from `ids`.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Append a new action of `kind` to the end of the document.
    ///
    /// `param` is kept only when the catalog entry takes a parameter.
    /// Unknown kinds are rejected with [`WorkflowError::UnknownActionKind`].
    pub fn append(
        &self,
        document: &WorkflowDocument,
        kind: &str,
        param: impl Into<String>,
    ) -> Result<WorkflowDocument> {
        let definition = catalog::lookup(kind)
            .ok_or_else(|| WorkflowError::UnknownActionKind(kind.to_string()))?;

        let kind_id = definition.kind.id();
        let instance = ActionInstance {
            instance_id: self.fresh_id(document, kind_id),
            kind: kind_id.to_string(),
            display_label: definition.label.to_string(),
            param: definition.has_param().then(|| param.into()),
        };
        debug!(
            "Appending {} ({}) at position {}",
            instance.instance_id,
            kind_id,
            document.len()
        );

        let mut next = document.clone();
        next.actions.push(instance);
        Ok(next)
    }

    /// Remove the action at `index`, keeping the order of the rest.
    pub fn remove_at(
        &self,
        document: &WorkflowDocument,
        index: usize,
    ) -> Result<WorkflowDocument> {
        check_index(document, index)?;

        let mut next = document.clone();
        let removed = next.actions.remove(index);
        debug!("Removed {} from position {}", removed.instance_id, index);
        Ok(next)
    }

    /// Move the action at `from` so that it ends up at `to`.
    ///
    /// `to` addresses the list after the element has been taken out, which is
    /// the usual drag-and-drop reorder semantics: the moved element is found at
    /// index `to` in the result.
    pub fn move_to(
        &self,
        document: &WorkflowDocument,
        from: usize,
        to: usize,
    ) -> Result<WorkflowDocument> {
        check_index(document, from)?;
        check_index(document, to)?;

        let mut next = document.clone();
        let item = next.actions.remove(from);
        next.actions.insert(to, item);
        Ok(next)
    }

    /// Replace the trigger label.
    pub fn set_label(
        &self,
        document: &WorkflowDocument,
        label: impl Into<String>,
    ) -> WorkflowDocument {
        WorkflowDocument {
            trigger_label: label.into(),
            actions: document.actions.clone(),
        }
    }

    /// Build an id for `kind_id` that no action in `document` already uses.
    fn fresh_id(&self, document: &WorkflowDocument, kind_id: &str) -> String {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = format!("{}-{}", kind_id, self.ids.next_token());
            if !document.contains_id(&candidate) {
                return candidate;
            }
        }
        // The injected generator keeps repeating itself; a random token cannot
        // realistically collide.
        loop {
            let candidate = format!("{}-{}", kind_id, UuidIds.next_token());
            if !document.contains_id(&candidate) {
                return candidate;
            }
        }
    }
}

fn check_index(document: &WorkflowDocument, index: usize) -> Result<()> {
    if index < document.len() {
        Ok(())
    } else {
        Err(WorkflowError::IndexOutOfRange {
            index,
            len: document.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ActionKind;

    fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new(Arc::new(SequentialIds::new()))
    }

    fn doc_with(kinds: &[&str]) -> WorkflowDocument {
        let b = builder();
        kinds.iter().fold(WorkflowDocument::new(), |doc, kind| {
            b.append(&doc, kind, format!("p-{kind}")).unwrap()
        })
    }

    fn ids(doc: &WorkflowDocument) -> Vec<String> {
        doc.actions.iter().map(|a| a.instance_id.clone()).collect()
    }

    /// Always hands out the same token.
    struct StuckIds;

    impl IdGenerator for StuckIds {
        fn next_token(&self) -> String {
            "same".to_string()
        }
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_token(), "1");
        assert_eq!(ids.next_token(), "2");
    }

    #[test]
    fn test_uuid_ids_differ() {
        assert_ne!(UuidIds.next_token(), UuidIds.next_token());
    }

    #[test]
    fn test_append_every_kind() {
        let b = builder();
        for def in catalog::all() {
            let doc = b
                .append(&WorkflowDocument::new(), def.kind.id(), "input")
                .unwrap();
            let last = doc.actions.last().unwrap();
            assert_eq!(last.display_label, def.label);
            assert_eq!(last.kind, def.kind.id());
            assert_eq!(last.param.is_none(), !def.has_param());
            if def.has_param() {
                assert_eq!(last.param.as_deref(), Some("input"));
            }
        }
    }

    #[test]
    fn test_append_by_alias_stores_id() {
        let doc = builder()
            .append(&WorkflowDocument::new(), "grow-trigger", "ignored")
            .unwrap();
        assert_eq!(doc.actions[0].kind, "increaseButtonSize");
        assert_eq!(doc.actions[0].action_kind(), Some(ActionKind::GrowTrigger));
        assert_eq!(doc.actions[0].param, None);
        assert_eq!(doc.actions[0].instance_id, "increaseButtonSize-1");
    }

    #[test]
    fn test_append_unknown_kind() {
        let doc = doc_with(&["alert", "showText"]);
        let result = builder().append(&doc, "launchRocket", "now");
        match result {
            Err(WorkflowError::UnknownActionKind(kind)) => assert_eq!(kind, "launchRocket"),
            other => panic!("Expected UnknownActionKind, got: {other:?}"),
        }
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_append_does_not_mutate_input() {
        let doc = doc_with(&["alert"]);
        let before = doc.clone();
        let next = builder().append(&doc, "showText", "x").unwrap();
        assert_eq!(doc, before);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_append_ids_unique_in_same_tick() {
        let b = builder();
        let mut doc = WorkflowDocument::new();
        for _ in 0..50 {
            doc = b.append(&doc, "showText", "x").unwrap();
        }
        assert!(doc.duplicate_ids().is_empty());
    }

    #[test]
    fn test_append_skips_ids_already_in_loaded_document() {
        // A document saved by a previous process whose counter also started at 1
        let loaded = doc_with(&["showText", "showText"]);
        let doc = builder().append(&loaded, "showText", "x").unwrap();
        assert!(doc.duplicate_ids().is_empty());
        assert_eq!(doc.actions[2].instance_id, "showText-3");
    }

    #[test]
    fn test_append_with_stuck_generator_stays_unique() {
        let b = WorkflowBuilder::new(Arc::new(StuckIds));
        let mut doc = WorkflowDocument::new();
        for _ in 0..3 {
            doc = b.append(&doc, "alert", "x").unwrap();
        }
        assert_eq!(doc.actions[0].instance_id, "alert-same");
        assert!(doc.duplicate_ids().is_empty());
    }

    #[test]
    fn test_remove_at() {
        let doc = doc_with(&["alert", "showText", "showImage", "close"]);
        let next = builder().remove_at(&doc, 1).unwrap();
        assert_eq!(next.len(), doc.len() - 1);
        assert_eq!(
            ids(&next),
            vec![
                doc.actions[0].instance_id.clone(),
                doc.actions[2].instance_id.clone(),
                doc.actions[3].instance_id.clone(),
            ]
        );
    }

    #[test]
    fn test_remove_out_of_range() {
        let doc = doc_with(&["alert"]);
        match builder().remove_at(&doc, 1) {
            Err(WorkflowError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("Expected IndexOutOfRange, got: {other:?}"),
        }
        assert!(builder().remove_at(&WorkflowDocument::new(), 0).is_err());
    }

    #[test]
    fn test_move_forward_and_back() {
        let doc = doc_with(&["alert", "showText", "showImage", "close"]);
        let original = ids(&doc);

        // 0 -> 2: [b, c, a, d]
        let moved = builder().move_to(&doc, 0, 2).unwrap();
        assert_eq!(
            ids(&moved),
            vec![
                original[1].clone(),
                original[2].clone(),
                original[0].clone(),
                original[3].clone(),
            ]
        );

        // 3 -> 0: [d, a, b, c]
        let moved = builder().move_to(&doc, 3, 0).unwrap();
        assert_eq!(moved.actions[0].instance_id, original[3]);
        assert_eq!(moved.actions[1].instance_id, original[0]);
    }

    #[test]
    fn test_move_is_permutation() {
        let doc = doc_with(&["alert", "showText", "showImage", "close", "refresh"]);
        let mut expected = ids(&doc);
        expected.sort();

        for from in 0..doc.len() {
            for to in 0..doc.len() {
                let moved = builder().move_to(&doc, from, to).unwrap();
                assert_eq!(moved.actions[to], doc.actions[from]);

                let mut got = ids(&moved);
                got.sort();
                assert_eq!(got, expected);
            }
        }
    }

    #[test]
    fn test_move_same_index_is_identity() {
        let doc = doc_with(&["alert", "showText"]);
        assert_eq!(builder().move_to(&doc, 1, 1).unwrap(), doc);
    }

    #[test]
    fn test_move_out_of_range() {
        let doc = doc_with(&["alert", "showText"]);
        assert!(matches!(
            builder().move_to(&doc, 2, 0),
            Err(WorkflowError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            builder().move_to(&doc, 0, 2),
            Err(WorkflowError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_set_label() {
        let doc = doc_with(&["alert"]);
        let next = builder().set_label(&doc, "Press me");
        assert_eq!(next.trigger_label, "Press me");
        assert_eq!(next.actions, doc.actions);

        let cleared = builder().set_label(&next, "");
        assert_eq!(cleared.trigger_label, "");
    }
}
