//! Failure forest construction.
//!
//! Failure nodes and events form their own "caused-by" forest, one tree per
//! structural element that owns failure entries. The forest never merges
//! with the hierarchy graph; the synthesizer correlates the two by base
//! name or description.

use rbd_core::{base_name, Digraph, Element, ElementKind};
use tracing::debug;

use crate::error::TranslationError;
use crate::index::ModelIndex;

/// Failure forest with element payloads, keyed by `{Kind}_{name}` ids.
pub type FailureForest = Digraph<Element>;

/// Build the failure forest from the failure index.
///
/// A failure node's parent must exist in the component index; a failure
/// event's parent must exist in the failure index. Either missing is fatal.
pub fn build_failure_forest(index: &ModelIndex) -> Result<FailureForest, TranslationError> {
    let mut forest = FailureForest::new();

    for entry in index.failures() {
        let parent = match entry.kind {
            ElementKind::FailureNode => index
                .components_named(&entry.parent)
                .next()
                .cloned(),
            ElementKind::FailureEvent => index.failure(&entry.parent).cloned(),
            _ => None,
        };
        let Some(parent) = parent else {
            return Err(TranslationError::UnresolvedFailureParent {
                id: entry.graph_id(),
                parent: entry.parent.clone(),
            });
        };

        let parent_id = parent.graph_id();
        let child_id = entry.graph_id();
        forest.ensure_node(&parent_id, || parent.clone());
        forest.ensure_node(&child_id, || entry.clone());
        forest.add_edge(&parent_id, &child_id)?;
    }

    debug!(
        nodes = forest.node_count(),
        trees = forest.weak_components().len(),
        "failure forest built"
    );
    Ok(forest)
}

/// Extract the forest component owned by the given structural key, matching
/// the owning root by description first, then by base name.
pub fn failure_component(
    forest: &FailureForest,
    description: Option<&str>,
    key: &str,
) -> FailureForest {
    let wanted_by_description = description;
    let wanted_by_name = base_name(key);
    for component in forest.weak_components() {
        let Some(root) = component.sources().into_iter().next() else {
            continue;
        };
        let root_name = root.split_once('_').map(|(_, n)| n).unwrap_or(&root);
        let matched = wanted_by_description.is_some_and(|d| d == root_name)
            || root_name == key
            || root_name == wanted_by_name;
        if matched {
            return component;
        }
    }
    FailureForest::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use rbd_core::rows::{ComponentRow, RowSet};

    fn component(kind: &str, name: &str, parent: &str) -> ComponentRow {
        ComponentRow {
            kind: kind.into(),
            name: name.into(),
            parent: parent.into(),
            code: String::new(),
            instances: 1,
            description: String::new(),
        }
    }

    fn rows_with_failures() -> RowSet {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT"));
        rows.components.push(component("Basic", "B", "A"));
        rows.components.push(component("FailureNode", "PowerLoss", "A"));
        rows.components.push(component("FailureEvent", "B", "PowerLoss"));
        rows
    }

    #[test]
    fn forest_edges_use_kind_prefixed_ids() {
        let index = build_index(&rows_with_failures()).unwrap();
        let forest = build_failure_forest(&index).unwrap();
        assert!(forest.contains("Compound_A"));
        assert!(forest.contains("FailureNode_PowerLoss"));
        assert_eq!(
            forest.successors("FailureNode_PowerLoss"),
            &["FailureEvent_B".to_string()]
        );
    }

    #[test]
    fn unresolved_parent_is_fatal() {
        let mut rows = rows_with_failures();
        rows.components
            .push(component("FailureEvent", "Ghost", "NoSuchNode"));
        let index = build_index(&rows).unwrap();
        assert!(matches!(
            build_failure_forest(&index),
            Err(TranslationError::UnresolvedFailureParent { .. })
        ));
    }

    #[test]
    fn component_extraction_by_name_and_description() {
        let index = build_index(&rows_with_failures()).unwrap();
        let forest = build_failure_forest(&index).unwrap();
        let by_name = failure_component(&forest, None, "A");
        assert_eq!(by_name.node_count(), 3);
        let by_description = failure_component(&forest, Some("A"), "Sys.A.Clone");
        assert_eq!(by_description.node_count(), 3);
        let missing = failure_component(&forest, None, "Nope");
        assert!(missing.is_empty());
    }
}
