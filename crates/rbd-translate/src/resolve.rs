//! Hierarchy graph construction and template/sharing resolution.
//!
//! The raw hierarchy graph comes straight from `(parent -> child)` rows. A
//! node referenced by more than one parent (a shared or templated
//! sub-hierarchy) violates the tree shape the synthesizer needs, so the
//! resolver repeatedly clones such subtrees, one copy per parent, until
//! every node has a single structural parent. Each clone is relabeled by
//! lineage, so the final keys are fully qualified dotted path names.

use std::collections::HashSet;

use rbd_core::{base_name, Digraph, Element, ElementKind, GraphError, Logic};
use tracing::{debug, warn};

use crate::error::TranslationError;
use crate::index::ModelIndex;

/// Key of the synthetic model root.
pub const ROOT: &str = "ROOT";

/// Hierarchy graph with element payloads.
pub type Hierarchy = Digraph<Element>;

fn synthetic_root() -> Element {
    Element::new(ElementKind::Compound, ROOT, "").with_logic(Logic::Root)
}

/// Build the raw hierarchy graph from the structural component index.
///
/// Fails fast with `Cycle` if the parent/child rows do not form a DAG.
pub fn build_raw_hierarchy(index: &ModelIndex) -> Result<Hierarchy, TranslationError> {
    let mut graph = Hierarchy::new();
    graph.ensure_node(ROOT, synthetic_root);

    // Nodes first: an element row wins over any placeholder created for a
    // parent that is only ever mentioned on the right-hand side.
    for element in index.components() {
        if !graph.contains(&element.name) {
            graph.add_node(element.name.clone(), element.clone())?;
        }
    }
    for element in index.components() {
        if !graph.contains(&element.parent) {
            warn!(parent = %element.parent, child = %element.name, "parent has no component row");
            let placeholder = Element::new(ElementKind::Compound, element.parent.clone(), ROOT);
            let _ = graph.add_node(element.parent.clone(), placeholder);
        }
        graph.add_edge(&element.parent, &element.name)?;
    }

    if let Err(GraphError::CycleDetected(node)) = graph.topological_order() {
        return Err(TranslationError::Cycle { node });
    }
    Ok(graph)
}

/// Insert `segment` immediately before the last dot-segment of `label`.
fn insert_segment(label: &str, segment: &str) -> String {
    match label.rfind('.') {
        Some(pos) => format!("{}.{}.{}", &label[..pos], segment, &label[pos + 1..]),
        None => format!("{segment}.{label}"),
    }
}

/// Resolve shared subtrees into per-parent clones until the hierarchy is a
/// tree rooted at `ROOT`.
///
/// Returns the resolved tree and the number of nodes created by cloning.
/// The worklist is recomputed after every rewrite, so the graph is never
/// mutated while being iterated. Termination for pathological inputs
/// (mutually referencing templates) is enforced by `max_passes`.
pub fn resolve_hierarchy(
    mut graph: Hierarchy,
    max_passes: u32,
) -> Result<(Hierarchy, usize), TranslationError> {
    let mut clones = 0usize;
    let mut passes = 0u32;

    loop {
        let shared = graph
            .bfs_nodes(ROOT)
            .into_iter()
            .find(|key| graph.in_degree(key) > 1);
        let Some(target) = shared else { break };

        passes += 1;
        if passes > max_passes {
            return Err(TranslationError::TemplateExpansion { passes: max_passes });
        }

        let parents: Vec<String> = graph.predecessors(&target).to_vec();
        for parent in &parents {
            graph.remove_edge(parent, &target);
        }

        let members: Vec<String> = graph.descendants(&target);
        let member_set: HashSet<String> = members.iter().cloned().collect();
        let subtree = graph.subgraph(&member_set);
        for key in &members {
            graph.remove_node(key)?;
        }

        for parent in &parents {
            let lineage = base_name(parent);
            let mut clone = Hierarchy::new();
            for key in subtree.keys() {
                let new_key = insert_segment(key, lineage);
                let element = subtree
                    .get(key)
                    .expect("subtree key")
                    .renamed(new_key.clone());
                clone.add_node(new_key, element)?;
            }
            for (src, dst) in subtree.edges() {
                clone.add_edge(&insert_segment(&src, lineage), &insert_segment(&dst, lineage))?;
            }
            clones += clone.node_count();
            graph.merge(&clone)?;
            graph.add_edge(parent, &insert_segment(&target, lineage))?;
        }

        debug!(node = %target, parents = parents.len(), "shared subtree expanded");
    }

    Ok((graph, clones))
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
            code: "C1".into(),
            instances: 1,
            description: String::new(),
        }
    }

    fn hierarchy_of(rows: RowSet) -> Hierarchy {
        let index = build_index(&rows).unwrap();
        build_raw_hierarchy(&index).unwrap()
    }

    #[test]
    fn raw_graph_rooted_at_root() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT"));
        rows.components.push(component("Basic", "B", "A"));
        let g = hierarchy_of(rows);
        assert_eq!(g.sources(), vec![ROOT]);
        assert_eq!(g.successors("A"), &["B".to_string()]);
    }

    #[test]
    fn component_cycle_is_fatal() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT"));
        rows.components.push(component("Compound", "B", "A"));
        rows.components.push(component("Compound", "A", "B"));
        let index = build_index(&rows).unwrap();
        assert!(matches!(
            build_raw_hierarchy(&index),
            Err(TranslationError::Cycle { .. })
        ));
    }

    #[test]
    fn insert_segment_qualifies_by_lineage() {
        assert_eq!(insert_segment("Tpl", "A"), "A.Tpl");
        assert_eq!(insert_segment("A.Tpl", "Sys"), "A.Sys.Tpl");
    }

    #[test]
    fn shared_subtree_cloned_per_parent() {
        // Tpl (with child X) is referenced by both A and B.
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT"));
        rows.components.push(component("Compound", "B", "ROOT"));
        rows.components.push(component("Compound", "Tpl", "*"));
        rows.components.push(component("Compound", "Tpl", "A"));
        rows.components.push(component("Compound", "Tpl", "B"));
        rows.components.push(component("Basic", "X", "Tpl"));
        let g = hierarchy_of(rows);
        let (resolved, clones) = resolve_hierarchy(g, 100).unwrap();

        // Tree invariant: nobody keeps more than one parent.
        for key in resolved.keys() {
            assert!(resolved.in_degree(key) <= 1, "{key} has multiple parents");
        }
        assert!(resolved.contains("A.Tpl"));
        assert!(resolved.contains("B.Tpl"));
        // Every clone key gains the parent's base name before its last segment.
        assert!(resolved.contains("A.X"));
        assert!(resolved.contains("B.X"));
        assert!(!resolved.contains("Tpl"));
        assert_eq!(clones, 4);

        // Clones share everything but identity.
        let a = resolved.get("A.Tpl").unwrap();
        let b = resolved.get("B.Tpl").unwrap();
        assert_eq!(a.code, b.code);
        assert_eq!(a.logic, b.logic);
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn runaway_expansion_is_bounded() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT"));
        rows.components.push(component("Compound", "B", "ROOT"));
        rows.components.push(component("Compound", "S", "A"));
        rows.components.push(component("Compound", "S", "B"));
        let g = hierarchy_of(rows);
        // One pass is needed; a zero-pass budget must abort, not loop.
        assert!(matches!(
            resolve_hierarchy(g, 0),
            Err(TranslationError::TemplateExpansion { .. })
        ));
    }
}
