//! Translation pipeline orchestrator.

use rbd_core::RowSet;
use tracing::debug;

use crate::emit::{Emitter, FailureModelRecord, LaborRecord, SpareRecord};
use crate::error::TranslationError;
use crate::failures::build_failure_forest;
use crate::flatten::serialize_rbd;
use crate::index::build_index;
use crate::layout::{LayeredLayout, LayoutProvider};
use crate::resolve::{build_raw_hierarchy, resolve_hierarchy};
use crate::synthesize::build_rbd;

/// Configuration for one translation run.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// Upper bound on template-expansion rewrites; exceeding it aborts the
    /// run instead of looping on a pathological template graph.
    pub max_resolution_passes: u32,
    /// Multiplier applied to layout coordinates in the output records.
    pub display_scale: f64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            max_resolution_passes: 10_000,
            display_scale: 1.75,
        }
    }
}

/// Statistics of a completed translation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationReport {
    /// Structural component entries indexed.
    pub components: usize,
    /// Nodes created by template/sharing expansion.
    pub clones: usize,
    /// Compound blocks synthesized.
    pub diagrams: usize,
    /// Flat block records emitted.
    pub blocks: usize,
    /// Flat junction records emitted.
    pub nodes: usize,
    /// Flat connection records emitted.
    pub connections: usize,
    /// Non-fatal conditions logged and dropped.
    pub warnings: usize,
}

/// Run the full translation pipeline with the default layered layout:
/// index -> resolve hierarchy -> failure forest -> synthesize -> flatten.
pub fn translate<E: Emitter>(
    rows: &RowSet,
    emitter: &mut E,
    config: &TranslateConfig,
) -> Result<TranslationReport, TranslationError> {
    translate_with_layout(rows, &LayeredLayout::default(), emitter, config)
}

/// Run the full translation pipeline with an explicit layout provider.
pub fn translate_with_layout<E: Emitter>(
    rows: &RowSet,
    layout: &dyn LayoutProvider,
    emitter: &mut E,
    config: &TranslateConfig,
) -> Result<TranslationReport, TranslationError> {
    let index = build_index(rows)?;

    let raw = build_raw_hierarchy(&index)?;
    let (tree, clones) = resolve_hierarchy(raw, config.max_resolution_passes)?;

    let forest = build_failure_forest(&index)?;
    let rbd = build_rbd(&tree, &forest, layout)?;

    let stats = serialize_rbd(&rbd, emitter, config.display_scale)?;

    for model in index.models() {
        emitter.add_failure_model(FailureModelRecord::from_model(model));
    }
    for row in &rows.manpower {
        emitter.add_labor(LaborRecord {
            identifier: row.manpower_type.clone(),
            availability: row.availability,
            cost: row.cost,
        });
    }
    for row in &rows.spares {
        emitter.add_spare(SpareRecord {
            identifier: row.device_type.clone(),
            availability: row.availability,
            cost: row.cost,
        });
    }
    emitter
        .commit()
        .map_err(|message| TranslationError::Commit { message })?;

    let report = TranslationReport {
        components: index.components().len(),
        clones,
        diagrams: rbd.len(),
        blocks: stats.blocks,
        nodes: stats.nodes,
        connections: stats.connections,
        warnings: index.warnings,
    };
    debug!(?report, "translation finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::RowEmitter;
    use rbd_core::rows::{ComponentRow, LogicRow};

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

    #[test]
    fn pipeline_emits_and_commits() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Basic", "B", "A", 1));
        rows.components.push(component("Basic", "C", "A", 1));
        rows.logic.push(LogicRow {
            kind: "inherited".into(),
            component: "A".into(),
            logic: "AND".into(),
        });

        let mut emitter = RowEmitter::new();
        let report = translate(&rows, &mut emitter, &TranslateConfig::default()).unwrap();
        assert!(emitter.committed());
        assert_eq!(report.components, 3);
        assert_eq!(report.diagrams, 2); // ROOT and A
        assert_eq!(report.blocks, emitter.blocks.len());
        assert_eq!(report.connections, emitter.connections.len());
    }

    #[test]
    fn fatal_error_emits_nothing() {
        let mut rows = RowSet::new();
        rows.components.push(component("Compound", "A", "ROOT", 1));
        rows.components.push(component("Compound", "B", "A", 1));
        rows.components.push(component("Compound", "A", "B", 1));

        let mut emitter = RowEmitter::new();
        let result = translate(&rows, &mut emitter, &TranslateConfig::default());
        assert!(matches!(result, Err(TranslationError::Cycle { .. })));
        assert!(!emitter.committed());
        assert!(emitter.blocks.is_empty());
    }
}
