//! Engine-level error types.

use thiserror::Error;

/// Configuration-level failures that abort a run before or during resolution.
///
/// Failures inside a node never surface here; they become node status
/// `error` and a [`NodeFailure`](crate::NodeFailure) in the run report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ------ Validation errors ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// An edge references a node ID that doesn't exist in the workflow.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference {
        node_id: String,
        side: &'static str,
    },

    // ------ Run errors ------

    /// The requested node does not exist.
    #[error("node not found: '{0}'")]
    NodeNotFound(String),

    /// Another run holds this workflow and the session rejects concurrent runs.
    #[error("a run is already in progress for this workflow")]
    RunInProgress,
}
