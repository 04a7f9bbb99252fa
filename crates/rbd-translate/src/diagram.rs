//! Internal diagram elements: leaf blocks and junction nodes.

use rbd_core::{Digraph, Element, StandbyMode};

/// Type label written into output records for a leaf block.
pub const BLOCK_TYPE: &str = "Rbd block";
/// Type label written into output records for a junction node.
pub const NODE_TYPE: &str = "Rbd node";

/// A leaf block instance inside a compound component's internal diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct RbdBlock {
    /// Qualified element name.
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    /// 1-based instance number; `None` for single-instance blocks.
    pub instance: Option<u32>,
    pub standby_mode: Option<StandbyMode>,
    pub failure_model: Option<String>,
}

impl RbdBlock {
    pub fn from_element(element: &Element) -> Self {
        Self {
            name: element.name.clone(),
            code: element.code.clone(),
            description: element.description.clone(),
            instance: None,
            standby_mode: None,
            failure_model: element.failure_model.clone(),
        }
    }

    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Diagram-local identity: `name` or `name.instance`.
    pub fn id(&self) -> String {
        match self.instance {
            Some(i) => format!("{}.{}", self.name, i),
            None => self.name.clone(),
        }
    }
}

/// A synthetic junction node, optionally carrying a vote threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RbdJunction {
    pub name: String,
    pub vote: Option<u32>,
}

impl RbdJunction {
    pub fn new(name: impl Into<String>, vote: Option<u32>) -> Self {
        Self {
            name: name.into(),
            vote,
        }
    }

    pub fn id(&self) -> String {
        self.name.clone()
    }
}

/// A node of an internal diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum RbdElement {
    Block(RbdBlock),
    Junction(RbdJunction),
}

impl RbdElement {
    pub fn id(&self) -> String {
        match self {
            RbdElement::Block(b) => b.id(),
            RbdElement::Junction(j) => j.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RbdElement::Block(b) => &b.name,
            RbdElement::Junction(j) => &j.name,
        }
    }

    pub fn instance(&self) -> Option<u32> {
        match self {
            RbdElement::Block(b) => b.instance,
            RbdElement::Junction(_) => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            RbdElement::Block(b) => b.code.as_deref(),
            RbdElement::Junction(_) => None,
        }
    }

    /// Type label used by output connection records.
    pub fn object_type(&self) -> &'static str {
        match self {
            RbdElement::Block(_) => BLOCK_TYPE,
            RbdElement::Junction(_) => NODE_TYPE,
        }
    }

    pub fn as_block(&self) -> Option<&RbdBlock> {
        match self {
            RbdElement::Block(b) => Some(b),
            RbdElement::Junction(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut RbdBlock> {
        match self {
            RbdElement::Block(b) => Some(b),
            RbdElement::Junction(_) => None,
        }
    }
}

/// An internal diagram: a directed graph of blocks and junctions.
pub type Diagram = Digraph<RbdElement>;

/// Insert a block into a diagram under its own id.
pub fn push_block(diagram: &mut Diagram, block: RbdBlock) -> String {
    let id = block.id();
    let _ = diagram.add_node(id.clone(), RbdElement::Block(block));
    id
}

/// Insert a junction into a diagram under its own id.
pub fn push_junction(diagram: &mut Diagram, junction: RbdJunction) -> String {
    let id = junction.id();
    let _ = diagram.add_node(id.clone(), RbdElement::Junction(junction));
    id
}

/// Give a finalized shape to a diagram: exactly one source and one sink.
///
/// A diagram with several sources gains a synthetic entry junction feeding
/// all of them; symmetrically for sinks.
pub fn finalize(name: &str, diagram: &mut Diagram) {
    let entry_points = diagram.sources();
    if entry_points.len() > 1 {
        let entry = push_junction(
            diagram,
            RbdJunction::new(format!("{name}.__ENTRY_POINT"), None),
        );
        for point in entry_points {
            let _ = diagram.add_edge(&entry, &point);
        }
    }
    let exit_points = diagram.sinks();
    if exit_points.len() > 1 {
        let exit = push_junction(
            diagram,
            RbdJunction::new(format!("{name}.__EXIT_POINT"), None),
        );
        for point in exit_points {
            let _ = diagram.add_edge(&point, &exit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbd_core::ElementKind;

    fn block(name: &str, instance: Option<u32>) -> RbdBlock {
        let b = RbdBlock::from_element(&Element::new(ElementKind::Basic, name, "P"));
        match instance {
            Some(i) => b.with_instance(i),
            None => b,
        }
    }

    #[test]
    fn block_identity() {
        assert_eq!(block("B", None).id(), "B");
        assert_eq!(block("B", Some(2)).id(), "B.2");
    }

    #[test]
    fn finalize_merges_sources_and_sinks() {
        let mut d = Diagram::new();
        push_block(&mut d, block("A", Some(1)));
        push_block(&mut d, block("A", Some(2)));
        finalize("X", &mut d);
        assert_eq!(d.sources().len(), 1);
        assert_eq!(d.sinks().len(), 1);
        assert!(d.contains("X.__ENTRY_POINT"));
        assert!(d.contains("X.__EXIT_POINT"));
    }

    #[test]
    fn finalize_keeps_single_chain_untouched() {
        let mut d = Diagram::new();
        let a = push_block(&mut d, block("A", None));
        let b = push_block(&mut d, block("B", None));
        d.add_edge(&a, &b).unwrap();
        finalize("X", &mut d);
        assert_eq!(d.node_count(), 2);
        assert_eq!(d.sources(), vec!["A"]);
        assert_eq!(d.sinks(), vec!["B"]);
    }
}
