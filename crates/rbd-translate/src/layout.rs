//! Diagram layout: the coordinate-provider seam and a layered reference
//! implementation.
//!
//! The translator only needs display coordinates for the output records; it
//! treats layout as a pure function over a finalized diagram.

use std::collections::HashMap;

use crate::diagram::Diagram;

/// A 2-D display position on the layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Pure coordinate provider for finalized internal diagrams.
pub trait LayoutProvider {
    /// Return a position for every node id of the diagram.
    fn layout(&self, diagram: &Diagram) -> HashMap<String, Position>;
}

/// Longest-path layered layout.
///
/// Each node's column is its longest distance from a source; rows are
/// assigned by order within the column. Deterministic for a fixed diagram
/// construction sequence.
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    pub x_spacing: i64,
    pub y_spacing: i64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            x_spacing: 100,
            y_spacing: 60,
        }
    }
}

impl LayoutProvider for LayeredLayout {
    fn layout(&self, diagram: &Diagram) -> HashMap<String, Position> {
        let order = match diagram.topological_order() {
            Ok(order) => order,
            // Diagrams are acyclic by construction; fall back to insertion
            // order rather than failing the whole translation.
            Err(_) => diagram.keys().cloned().collect(),
        };

        let mut layer: HashMap<String, i64> = HashMap::new();
        for key in &order {
            let level = diagram
                .predecessors(key)
                .iter()
                .filter_map(|p| layer.get(p).map(|l| l + 1))
                .max()
                .unwrap_or(0);
            layer.insert(key.clone(), level);
        }

        let mut slots: HashMap<i64, i64> = HashMap::new();
        let mut positions = HashMap::new();
        for key in &order {
            let level = layer[key];
            let slot = slots.entry(level).or_insert(0);
            positions.insert(
                key.clone(),
                Position {
                    x: level * self.x_spacing,
                    y: *slot * self.y_spacing,
                },
            );
            *slot += 1;
        }
        positions
    }
}
