//! Translation engine for reliability block diagrams.
//!
//! Turns a flat, tabular reliability model into a fully expanded, flattened
//! block diagram through a multi-stage pipeline: index building, hierarchy
//! graph resolution (template/sharing expansion), failure-forest
//! construction, per-compound diagram synthesis, and flattening into
//! page-qualified records for a target-format emitter.

pub mod diagram;
pub mod emit;
pub mod error;
pub mod failures;
pub mod flatten;
pub mod index;
pub mod layout;
pub mod pipeline;
pub mod resolve;
pub mod synthesize;

pub use diagram::{Diagram, RbdBlock, RbdElement, RbdJunction};
pub use emit::{
    BlockRecord, ConnectionRecord, ConnectionRow, Emitter, FailureModelRecord, LaborRecord,
    NodeRecord, RowEmitter, SpareRecord,
};
pub use error::TranslationError;
pub use failures::{build_failure_forest, FailureForest};
pub use flatten::{serialize_rbd, FlattenStats};
pub use index::{build_index, ModelIndex};
pub use layout::{LayeredLayout, LayoutProvider, Position};
pub use pipeline::{translate, translate_with_layout, TranslateConfig, TranslationReport};
pub use resolve::{build_raw_hierarchy, resolve_hierarchy, Hierarchy, ROOT};
pub use synthesize::{build_rbd, synthesize, CompoundBlock, Rbd};
