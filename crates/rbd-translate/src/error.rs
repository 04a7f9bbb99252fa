//! Translation errors.

use rbd_core::{GraphError, LogicParseError, ParameterError, SchemaError};
use thiserror::Error;

/// Errors that abort the translation of the current model.
///
/// Every variant is fatal; recoverable conditions (dropped assignments,
/// ambiguous hint ordering) are logged as warnings and counted in the
/// report instead.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("input model contains a component cycle involving '{node}'")]
    Cycle { node: String },

    #[error(transparent)]
    Logic(#[from] LogicParseError),

    #[error("group element '{group}' has no logic but multiple children")]
    GroupWithoutLogic { group: String },

    #[error("failure entry '{id}' references unknown parent '{parent}'")]
    UnresolvedFailureParent { id: String, parent: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("template expansion did not converge after {passes} passes")]
    TemplateExpansion { passes: u32 },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("emitter commit failed: {message}")]
    Commit { message: String },
}
