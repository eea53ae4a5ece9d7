//! Core domain models for the workflow engine.
//!
//! These types are the in-memory workflow. They serialise to and from the
//! JSON document the editor produces (unknown fields such as canvas
//! positions are ignored).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nodes::traits::data_from;
use nodes::{Data, NodeKind};

// ---------------------------------------------------------------------------
// NodeStatus
// ---------------------------------------------------------------------------

/// Outcome of a node's most recent execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Success,
    Error,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single activity in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within this workflow (referenced by edges).
    pub id: String,
    /// Selects the executor in the registry.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Type-specific configuration plus whatever upstream nodes forwarded.
    #[serde(default)]
    pub data: Data,
    /// Written only by the orchestrator.
    #[serde(default)]
    pub status: NodeStatus,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, data: Value) -> Self {
        Self {
            id: id.into(),
            kind,
            data: data_from(data),
            status: NodeStatus::Idle,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed dependency and data link from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The session's node and edge store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            name: name.into(),
            nodes,
            edges,
        }
    }

    /// Linear-scan lookup for one-off access. Repeated lookups should go
    /// through [`Graph::get`](crate::Graph::get), which is indexed.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Status of a node, if it exists.
    pub fn status(&self, id: &str) -> Option<NodeStatus> {
        self.node(id).map(|n| n.status)
    }
}
