//! Core data model for the reliability-block-diagram translator.
//!
//! A reliability model arrives as flat, tabular rows describing components,
//! their hierarchy, failure logic, and failure distributions. This crate
//! holds the shared vocabulary of the translation pipeline: typed rows with
//! schema validation, the element/logic/failure-model records, and the
//! string-keyed directed-graph container every stage builds on.

pub mod element;
pub mod failure;
pub mod graph;
pub mod rows;

pub use element::{base_name, format_code, Element, ElementKind, Logic, LogicParseError, StandbyMode};
pub use failure::{Distribution, FailureModel, ParameterError, WeibullTriple};
pub use graph::{Digraph, GraphError};
pub use rows::{
    ComponentRow, FailureAssignmentRow, FailureModelRow, LogicRow, ManpowerRow, RowSet, SchemaError,
    Sheet, SpareRow,
};
