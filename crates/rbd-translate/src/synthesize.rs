//! Compound block synthesis: per-compound internal wiring diagrams.
//!
//! For every compound node of the resolved hierarchy this module expands
//! failure logic into an internal diagram of blocks and junctions. Plain
//! compounds expand their logic directly; compounds containing Group
//! elements are assembled bottom-up by merging group diagrams and then
//! overlaying the failure-forest logic.

use std::collections::{HashMap, HashSet};

use rbd_core::{base_name, Digraph, Element, ElementKind, GraphError, Logic};
use tracing::{debug, warn};

use crate::diagram::{finalize, push_block, push_junction, Diagram, RbdBlock, RbdElement, RbdJunction};
use crate::error::TranslationError;
use crate::failures::{failure_component, FailureForest};
use crate::layout::{LayoutProvider, Position};
use crate::resolve::{Hierarchy, ROOT};

/// Layout hint derived from the failure forest for a structural leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutHint {
    Series,
    Parallel,
}

/// A compound component together with its finalized internal diagram.
#[derive(Debug, Clone)]
pub struct CompoundBlock {
    /// Qualified component name; also the key other diagrams reference.
    pub name: String,
    pub code: Option<String>,
    pub diagram: Diagram,
    /// Diagram-local node id -> layout position.
    pub positions: HashMap<String, Position>,
}

/// All compound blocks of one model, in breadth-first construction order.
///
/// The first entry is the top-level (root) block; the flattening serializer
/// starts its walk there.
#[derive(Debug, Default)]
pub struct Rbd {
    blocks: Vec<CompoundBlock>,
    by_name: HashMap<String, usize>,
}

impl Rbd {
    pub fn top(&self) -> Option<&CompoundBlock> {
        self.blocks.first()
    }

    pub fn get(&self, name: &str) -> Option<&CompoundBlock> {
        self.by_name.get(name).map(|&i| &self.blocks[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompoundBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn push(&mut self, block: CompoundBlock) {
        self.by_name.insert(block.name.clone(), self.blocks.len());
        self.blocks.push(block);
    }
}

/// Build the internal diagram of every compound node of the resolved tree,
/// in breadth-first order from the root.
pub fn build_rbd(
    tree: &Hierarchy,
    forest: &FailureForest,
    layout: &dyn LayoutProvider,
) -> Result<Rbd, TranslationError> {
    let mut rbd = Rbd::default();
    for key in tree.bfs_nodes(ROOT) {
        let Some(element) = tree.get(&key) else { continue };
        if element.kind != ElementKind::Compound {
            continue;
        }
        debug!(component = %key, "synthesizing internal diagram");
        let structural = extract_structural(tree, &key);
        let failures = failure_component(forest, element.description.as_deref(), &key);
        let mut diagram = synthesize(&key, &structural, &failures)?;
        finalize(&key, &mut diagram);
        let positions = layout.layout(&diagram);
        rbd.push(CompoundBlock {
            name: element.name.clone(),
            code: element.code.clone(),
            diagram,
            positions,
        });
    }
    Ok(rbd)
}

/// Extract the one-level structural subgraph of a compound node: all
/// descendants down to (and including) nested compound nodes, but nothing
/// below them.
fn extract_structural(tree: &Hierarchy, node: &str) -> Digraph<Element> {
    let mut sub = Digraph::new();
    let mut fringe: Vec<String> = Vec::new();
    for (src, dst) in tree.bfs_edges(node) {
        if fringe.iter().any(|f| tree.has_path(f, &dst)) {
            continue;
        }
        sub.ensure_node(&src, || tree.get(&src).expect("bfs source").clone());
        sub.ensure_node(&dst, || tree.get(&dst).expect("bfs target").clone());
        let _ = sub.add_edge(&src, &dst);
        if tree.get(&dst).map(|e| e.kind) == Some(ElementKind::Compound) {
            fringe.push(dst);
        }
    }
    sub
}

/// Synthesize the internal diagram for one compound component from its
/// structural subgraph and its failure sub-forest.
pub fn synthesize(
    name: &str,
    structural: &Digraph<Element>,
    failures: &FailureForest,
) -> Result<Diagram, TranslationError> {
    let Some(root) = structural.sources().into_iter().next() else {
        return Ok(Diagram::new());
    };
    let has_groups = structural
        .keys()
        .any(|k| structural.get(k).map(|e| e.kind) == Some(ElementKind::Group));
    if has_groups {
        expand_grouped(name, &root, structural, failures)
    } else {
        Ok(expand_plain(name, &root, structural))
    }
}

/// Enumerate the leaf block instances of a compound's direct children.
fn enumerate_blocks(structural: &Digraph<Element>, root: &str) -> Vec<RbdBlock> {
    let mut blocks = Vec::new();
    for child in structural.successors(root) {
        let Some(element) = structural.get(child) else { continue };
        if element.instances > 1 {
            for i in 1..=element.instances {
                blocks.push(RbdBlock::from_element(element).with_instance(i));
            }
        } else {
            blocks.push(RbdBlock::from_element(element));
        }
    }
    blocks
}

/// Case A: no Group children; expand the compound's own logic directly.
fn expand_plain(name: &str, root: &str, structural: &Digraph<Element>) -> Diagram {
    let logic = structural
        .get(root)
        .and_then(|e| e.logic)
        .unwrap_or_else(|| {
            warn!(component = name, "compound has no logic, wiring children in series");
            Logic::And
        });

    let mut diagram = Diagram::new();
    if logic.is_series() {
        let mut previous: Option<String> = None;
        for block in enumerate_blocks(structural, root) {
            let id = push_block(&mut diagram, block);
            if let Some(prev) = previous {
                let _ = diagram.add_edge(&prev, &id);
            }
            previous = Some(id);
        }
    } else {
        let input = push_junction(&mut diagram, RbdJunction::new(format!("{name}.In"), None));
        let output = push_junction(
            &mut diagram,
            RbdJunction::new(format!("{name}.Out"), logic.vote_value()),
        );
        for mut block in enumerate_blocks(structural, root) {
            block.standby_mode = logic.standby_mode();
            let id = push_block(&mut diagram, block);
            let _ = diagram.add_edge(&input, &id);
            let _ = diagram.add_edge(&id, &output);
        }
    }
    diagram
}

/// Case B: the compound contains Group children; build per-leaf diagrams,
/// merge groups bottom-up, then overlay failure logic.
fn expand_grouped(
    name: &str,
    root: &str,
    structural: &Digraph<Element>,
    failures: &FailureForest,
) -> Result<Diagram, TranslationError> {
    let mut working = structural.clone();
    let root = root.to_string();

    let mut diagrams: HashMap<String, Diagram> = HashMap::new();
    let mut hints: HashMap<String, LayoutHint> = HashMap::new();
    for leaf in working.sinks() {
        if let Some(hint) = leaf_hint(&working, failures, &leaf) {
            hints.insert(leaf.clone(), hint);
        }
        diagrams.insert(leaf.clone(), leaf_diagram(&working, &leaf));
    }

    let mut processed: HashSet<String> = HashSet::new();
    while working.node_count() > 2 {
        let Some(group) = find_deepest_group(&working, &root, &processed) else {
            break;
        };
        merge_group(&mut working, &group, &mut diagrams, &mut hints, &mut processed)?;
    }

    let children: Vec<String> = working.successors(&root).to_vec();
    if children.len() > 1 {
        warn!(component = name, "multiple unmerged children remain after group merging");
    }
    let mut diagram = Diagram::new();
    for child in &children {
        if let Some(d) = diagrams.get(child) {
            diagram.absorb(d);
        }
    }

    overlay_failure_logic(name, &mut diagram, failures);
    Ok(diagram)
}

/// Consult the failure forest for a layout hint for a structural leaf.
fn leaf_hint(
    structural: &Digraph<Element>,
    failures: &FailureForest,
    leaf: &str,
) -> Option<LayoutHint> {
    let root = failures.sources().into_iter().next()?;
    let element = structural.get(leaf)?;
    let target = element
        .description
        .as_deref()
        .unwrap_or_else(|| element.base_name());

    let mut hint = None;
    for (cause, effect) in failures.dfs_edges(&root) {
        if failures.get(&effect).map(|e| e.name.as_str()) != Some(target) {
            continue;
        }
        match failures.get(&cause).and_then(|e| e.logic) {
            Some(logic) if logic.is_parallel() => hint = Some(LayoutHint::Parallel),
            Some(Logic::And) => hint = Some(LayoutHint::Series),
            _ => {}
        }
    }
    hint
}

/// Build the minimal diagram for a single structural leaf.
fn leaf_diagram(structural: &Digraph<Element>, leaf: &str) -> Diagram {
    let mut diagram = Diagram::new();
    let Some(element) = structural.get(leaf) else {
        return diagram;
    };
    let inherited = structural
        .predecessors(leaf)
        .first()
        .and_then(|p| structural.get(p))
        .and_then(|e| e.logic);

    if element.instances > 1 {
        match inherited {
            // Series logic chains the instances right away.
            Some(logic) if logic.is_series() => {
                let mut previous: Option<String> = None;
                for i in 1..=element.instances {
                    let id = push_block(&mut diagram, RbdBlock::from_element(element).with_instance(i));
                    if let Some(prev) = previous {
                        let _ = diagram.add_edge(&prev, &id);
                    }
                    previous = Some(id);
                }
            }
            // Parallel or absent logic leaves the instances unconnected;
            // the failure-logic overlay supplies the fan-in.
            _ => {
                for i in 1..=element.instances {
                    push_block(&mut diagram, RbdBlock::from_element(element).with_instance(i));
                }
            }
        }
    } else {
        push_block(&mut diagram, RbdBlock::from_element(element));
    }
    diagram
}

/// Find the deepest not-yet-merged Group node below `root`.
fn find_deepest_group(
    working: &Digraph<Element>,
    root: &str,
    processed: &HashSet<String>,
) -> Option<String> {
    let mut depth: HashMap<String, usize> = HashMap::new();
    depth.insert(root.to_string(), 0);
    for (src, dst) in working.bfs_edges(root) {
        let d = depth.get(&src).copied().unwrap_or(0) + 1;
        depth.insert(dst, d);
    }

    let mut best: Option<(usize, String)> = None;
    for key in working.bfs_nodes(root) {
        if processed.contains(&key) {
            continue;
        }
        if working.get(&key).map(|e| e.kind) != Some(ElementKind::Group) {
            continue;
        }
        let d = depth.get(&key).copied().unwrap_or(0);
        if best.as_ref().is_none_or(|(bd, _)| d > *bd) {
            best = Some((d, key));
        }
    }
    best.map(|(_, key)| key)
}

/// Merge the children of a Group node into a single diagram according to
/// the group's logic, then collapse the children into the group node.
fn merge_group(
    working: &mut Digraph<Element>,
    group: &str,
    diagrams: &mut HashMap<String, Diagram>,
    hints: &mut HashMap<String, LayoutHint>,
    processed: &mut HashSet<String>,
) -> Result<(), TranslationError> {
    let element = working
        .get(group)
        .cloned()
        .ok_or_else(|| GraphError::NodeNotFound(group.to_string()))?;
    let mut children: Vec<String> = working.successors(group).to_vec();

    if element.logic.is_none() && children.len() > 1 {
        return Err(TranslationError::GroupWithoutLogic {
            group: element.name,
        });
    }
    processed.insert(group.to_string());

    if children.len() == 1 {
        // A single child passes its diagram through unchanged.
        let child = children.remove(0);
        if let Some(d) = diagrams.remove(&child) {
            diagrams.insert(group.to_string(), d);
        }
        if let Some(h) = hints.remove(&child) {
            hints.insert(group.to_string(), h);
        }
        working.remove_node(&child)?;
        return Ok(());
    }

    // Hinted children trail the merge order; their diagrams were shaped by
    // failure logic and anchor the group's own hint.
    let hinted: Vec<String> = children
        .iter()
        .filter(|c| hints.contains_key(*c))
        .cloned()
        .collect();
    if hinted.len() > 1 {
        warn!(
            group = %element.name,
            "more than one child carries a layout hint; their relative order is unspecified"
        );
    }
    for h in &hinted {
        children.retain(|c| c != h);
        children.push(h.clone());
        if let Some(hint) = hints.get(h).copied() {
            hints.insert(group.to_string(), hint);
        }
    }

    let instances = element.instances.max(1);
    let mut merged = Diagram::new();
    match element.logic {
        Some(logic) if logic.is_series() => {
            for pair in children.windows(2) {
                let (left, right) = (&pair[0], &pair[1]);
                let (Some(dl), Some(dr)) = (diagrams.get(left), diagrams.get(right)) else {
                    warn!(group = %element.name, "child without a diagram skipped in merge");
                    continue;
                };
                for i in 0..instances {
                    let d1 = diagram_instance(dl, i);
                    let d2 = diagram_instance(dr, i);
                    merged.absorb(&d1);
                    merged.absorb(&d2);
                    // Bridge every weak component of the left diagram to
                    // every weak component of the right one.
                    for c1 in d1.weak_components() {
                        let Some(sink) = c1.sinks().into_iter().next() else {
                            continue;
                        };
                        for c2 in d2.weak_components() {
                            let Some(source) = c2.sources().into_iter().next() else {
                                continue;
                            };
                            let _ = merged.add_edge(&sink, &source);
                        }
                    }
                }
            }
        }
        Some(logic) if logic.is_parallel() => {
            // Parallel groups keep their members fanned out; the
            // failure-logic overlay wires them into a voting junction.
            for child in &children {
                let Some(d) = diagrams.get(child) else { continue };
                for i in 0..instances {
                    merged.absorb(&diagram_instance(d, i));
                }
            }
        }
        _ => {}
    }

    diagrams.insert(group.to_string(), merged);
    for child in &children {
        working.remove_node(child)?;
        diagrams.remove(child);
        hints.remove(child);
    }
    Ok(())
}

/// Produce instance `k` (0-based) of a diagram by renumbering its blocks.
///
/// A block family of size one takes instance `k + 1`; a family of M blocks
/// with the same name re-derives `k * M + current`, keeping identities
/// globally unique without a global counter.
fn diagram_instance(diagram: &Diagram, k: u32) -> Diagram {
    let mut family_size: HashMap<String, u32> = HashMap::new();
    for key in diagram.keys() {
        if let Some(element) = diagram.get(key) {
            *family_size.entry(element.name().to_string()).or_insert(0) += 1;
        }
    }

    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut out = Diagram::new();
    for key in diagram.keys() {
        let element = diagram.get(key).expect("key listed in order").clone();
        let renumbered = match element {
            RbdElement::Block(mut block) => {
                let size = family_size.get(&block.name).copied().unwrap_or(1);
                let current = block.instance.unwrap_or(0);
                block.instance = Some(if size == 1 { k + 1 } else { k * size + current });
                RbdElement::Block(block)
            }
            junction @ RbdElement::Junction(_) => junction,
        };
        let new_key = renumbered.id();
        mapping.insert(key.clone(), new_key.clone());
        let _ = out.add_node(new_key, renumbered);
    }
    for (src, dst) in diagram.edges() {
        let _ = out.add_edge(&mapping[&src], &mapping[&dst]);
    }
    out
}

/// Overlay the failure-forest logic onto a merged diagram: every failure
/// event whose name matches diagram blocks applies its cause's logic among
/// the matching blocks, mirroring the plain-expansion wiring rules.
fn overlay_failure_logic(name: &str, diagram: &mut Diagram, failures: &FailureForest) {
    let Some(root) = failures.sources().into_iter().next() else {
        return;
    };
    for (cause_key, effect_key) in failures.dfs_edges(&root) {
        let Some(effect) = failures.get(&effect_key) else { continue };
        if effect.kind != ElementKind::FailureEvent {
            continue;
        }
        let matching: Vec<String> = diagram
            .keys()
            .filter(|k| {
                diagram
                    .get(k)
                    .and_then(|e| e.as_block())
                    .is_some_and(|b| b.name == effect.name || base_name(&b.name) == effect.name)
            })
            .cloned()
            .collect();
        if matching.is_empty() {
            continue;
        }
        let Some(logic) = failures.get(&cause_key).and_then(|e| e.logic) else {
            warn!(effect = %effect.name, "failure cause has no logic, overlay skipped");
            continue;
        };
        debug!(effect = %effect.name, %logic, "applying failure logic");

        if logic.is_parallel() {
            let junction_name = if diagram.contains(&format!("{name}.Out")) {
                format!("{name}.{}.Out", effect.name)
            } else {
                format!("{name}.Out")
            };
            let out_id = push_junction(
                diagram,
                RbdJunction::new(junction_name, logic.vote_value()),
            );
            for key in &matching {
                if let Some(block) = diagram.get_mut(key).and_then(|e| e.as_block_mut()) {
                    block.standby_mode = logic.standby_mode();
                }
                let _ = diagram.add_edge(key, &out_id);
            }
        } else if logic == Logic::And {
            for pair in matching.windows(2) {
                let _ = diagram.add_edge(&pair[0], &pair[1]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failures::build_failure_forest;
    use crate::index::build_index;
    use crate::layout::LayeredLayout;
    use crate::resolve::{build_raw_hierarchy, resolve_hierarchy};
    use rbd_core::rows::{ComponentRow, LogicRow, RowSet};

    fn component(kind: &str, name: &str, parent: &str, instances: u32) -> ComponentRow {
        ComponentRow {
            kind: kind.into(),
            name: name.into(),
            parent: parent.into(),
            code: String::new(),
            instances,
            description: String::new(),
        }
    }

    fn logic(kind: &str, component: &str, spec: &str) -> LogicRow {
        LogicRow {
            kind: kind.into(),
            component: component.into(),
            logic: spec.into(),
        }
    }

    fn rbd_for(rows: &RowSet) -> Rbd {
        let index = build_index(rows).unwrap();
        let raw = build_raw_hierarchy(&index).unwrap();
        let (tree, _) = resolve_hierarchy(raw, 100).unwrap();
        let forest = build_failure_forest(&index).unwrap();
        build_rbd(&tree, &forest, &LayeredLayout::default()).unwrap()
    }

    #[test]
    fn series_compound_chains_children() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Basic", "B", "A", 1));
        rows.components.push(component("Basic", "C", "A", 1));
        rows.logic.push(logic("inherited", "A", "AND"));

        let rbd = rbd_for(&rows);
        let a = rbd.get("A").unwrap();
        assert_eq!(a.diagram.node_count(), 2);
        assert_eq!(a.diagram.edges(), vec![("B".to_string(), "C".to_string())]);
        assert_eq!(a.diagram.sources(), vec!["B"]);
        assert_eq!(a.diagram.sinks(), vec!["C"]);
    }

    #[test]
    fn voting_compound_fans_instances() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Basic", "D", "A", 3));
        rows.logic.push(logic("inherited", "A", "ACTIVE(2,3)"));

        let rbd = rbd_for(&rows);
        let a = rbd.get("A").unwrap();
        // In + Out + three instances
        assert_eq!(a.diagram.node_count(), 5);
        assert_eq!(a.diagram.edge_count(), 6);
        for i in 1..=3 {
            let id = format!("D.{i}");
            assert!(a.diagram.contains(&id));
            let block = a.diagram.get(&id).unwrap().as_block().unwrap();
            assert_eq!(block.standby_mode, Some(rbd_core::StandbyMode::Hot));
        }
        let out = a.diagram.get("A.Out").unwrap();
        match out {
            RbdElement::Junction(j) => assert_eq!(j.vote, Some(2)),
            _ => panic!("A.Out must be a junction"),
        }
        let input = a.diagram.get("A.In").unwrap();
        match input {
            RbdElement::Junction(j) => assert_eq!(j.vote, None),
            _ => panic!("A.In must be a junction"),
        }
    }

    #[test]
    fn every_diagram_has_single_source_and_sink() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Basic", "D", "A", 3));
        rows.logic.push(logic("inherited", "A", "OR"));

        let rbd = rbd_for(&rows);
        for block in rbd.iter() {
            if block.diagram.is_empty() {
                continue;
            }
            assert_eq!(block.diagram.sources().len(), 1, "{}", block.name);
            assert_eq!(block.diagram.sinks().len(), 1, "{}", block.name);
        }
    }

    #[test]
    fn nested_compound_cut_at_one_level() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Compound", "B", "A", 1));
        rows.components.push(component("Basic", "C", "B", 1));
        rows.logic.push(logic("inherited", "A", "AND"));
        rows.logic.push(logic("inherited", "B", "AND"));

        let rbd = rbd_for(&rows);
        let a = rbd.get("A").unwrap();
        // A's diagram sees B as a leaf block, not C.
        assert!(a.diagram.contains("B"));
        assert!(!a.diagram.contains("C"));
        let b = rbd.get("B").unwrap();
        assert!(b.diagram.contains("C"));
    }

    #[test]
    fn grouped_series_merge_bridges_diagrams() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Group", "G", "A", 1));
        rows.components.push(component("Basic", "B", "G", 1));
        rows.components.push(component("Basic", "C", "G", 1));
        rows.logic.push(logic("inherited", "A", "AND"));
        rows.logic.push(logic("inherited", "G", "AND"));

        let rbd = rbd_for(&rows);
        let a = rbd.get("A").unwrap();
        assert!(a.diagram.contains("B.1"));
        assert!(a.diagram.contains("C.1"));
        assert_eq!(
            a.diagram.edges(),
            vec![("B.1".to_string(), "C.1".to_string())]
        );
    }

    #[test]
    fn group_without_logic_is_fatal() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Group", "G", "A", 1));
        rows.components.push(component("Basic", "B", "G", 1));
        rows.components.push(component("Basic", "C", "G", 1));
        rows.logic.push(logic("inherited", "A", "AND"));

        let index = build_index(&rows).unwrap();
        let raw = build_raw_hierarchy(&index).unwrap();
        let (tree, _) = resolve_hierarchy(raw, 100).unwrap();
        let forest = build_failure_forest(&index).unwrap();
        let result = build_rbd(&tree, &forest, &LayeredLayout::default());
        assert!(matches!(
            result,
            Err(TranslationError::GroupWithoutLogic { .. })
        ));
    }

    #[test]
    fn failure_overlay_adds_vote_junction() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Group", "G", "A", 1));
        rows.components.push(component("Basic", "P", "G", 2));
        rows.components.push(component("FailureNode", "PowerLoss", "A", 1));
        rows.components.push(component("FailureEvent", "P", "PowerLoss", 1));
        rows.logic.push(logic("inherited", "A", "AND"));
        rows.logic.push(logic("failure", "PowerLoss", "ACTIVE(1,2)"));

        let rbd = rbd_for(&rows);
        let a = rbd.get("A").unwrap();
        assert!(a.diagram.contains("P.1"));
        assert!(a.diagram.contains("P.2"));
        assert!(a.diagram.contains("A.Out"));
        let junction = match a.diagram.get("A.Out").unwrap() {
            RbdElement::Junction(j) => j,
            _ => panic!("A.Out must be a junction"),
        };
        assert_eq!(junction.vote, Some(1));
        assert_eq!(a.diagram.in_degree("A.Out"), 2);
    }

    #[test]
    fn diagram_instance_renumbering() {
        let mut d = Diagram::new();
        let element = Element::new(ElementKind::Basic, "B", "G");
        push_block(&mut d, RbdBlock::from_element(&element).with_instance(1));
        push_block(&mut d, RbdBlock::from_element(&element).with_instance(2));
        d.add_edge("B.1", "B.2").unwrap();

        let copy = diagram_instance(&d, 1);
        assert!(copy.contains("B.3"));
        assert!(copy.contains("B.4"));
        assert_eq!(copy.edges(), vec![("B.3".to_string(), "B.4".to_string())]);

        let mut single = Diagram::new();
        push_block(&mut single, RbdBlock::from_element(&element));
        let copy = diagram_instance(&single, 2);
        assert!(copy.contains("B.3"));
    }
}
