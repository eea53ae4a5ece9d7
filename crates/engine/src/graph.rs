//! Graph model: a read-only, pre-indexed view of a workflow's edges.
//!
//! Built at the start of every run. Rules enforced while building:
//! 1. Node IDs must be unique within the workflow.
//! 2. Every edge must reference valid node IDs (both `source` and `target`).
//!
//! Cycles are not rejected here; the resolver's visited set keeps a cyclic
//! graph from looping.
//!
//! Node indices are positions in `Workflow::nodes`, which a run never
//! reorders.

use std::collections::{HashMap, HashSet};

use crate::models::{Node, Workflow};
use crate::{Edge, EngineError};

/// Position of a node in `Workflow::nodes`.
pub type NodeIndex = usize;

/// Incoming/outgoing edge lookups keyed by node.
#[derive(Debug, Clone)]
pub struct Graph {
    ids: Vec<String>,
    index: HashMap<String, NodeIndex>,
    edges: Vec<Edge>,
    /// Per node: indices into `edges`, in declaration order.
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
    /// Per node: the source node of each incoming edge, same order as `incoming`.
    sources_of: Vec<Vec<NodeIndex>>,
}

impl Graph {
    /// Validate the workflow and index its edges.
    ///
    /// # Errors
    /// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
    /// - [`EngineError::UnknownNodeReference`] if an edge references a missing node.
    pub fn build(workflow: &Workflow) -> Result<Self, EngineError> {
        let mut seen_ids: HashSet<&str> = HashSet::new();
        for node in &workflow.nodes {
            if !seen_ids.insert(node.id.as_str()) {
                return Err(EngineError::DuplicateNodeId(node.id.clone()));
            }
        }

        let ids: Vec<String> = workflow.nodes.iter().map(|n| n.id.clone()).collect();
        let index: HashMap<String, NodeIndex> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut incoming = vec![Vec::new(); ids.len()];
        let mut outgoing = vec![Vec::new(); ids.len()];
        let mut sources_of = vec![Vec::new(); ids.len()];

        for (edge_idx, edge) in workflow.edges.iter().enumerate() {
            let source = *index.get(&edge.source).ok_or_else(|| EngineError::UnknownNodeReference {
                node_id: edge.source.clone(),
                side: "source",
            })?;
            let target = *index.get(&edge.target).ok_or_else(|| EngineError::UnknownNodeReference {
                node_id: edge.target.clone(),
                side: "target",
            })?;

            outgoing[source].push(edge_idx);
            incoming[target].push(edge_idx);
            sources_of[target].push(source);
        }

        Ok(Self {
            ids,
            index,
            edges: workflow.edges.clone(),
            incoming,
            outgoing,
            sources_of,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// # Errors
    /// [`EngineError::NodeNotFound`] for an unknown id.
    pub fn index_of(&self, id: &str) -> Result<NodeIndex, EngineError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.ids[idx]
    }

    /// Indexed node lookup in `workflow`, which must be the workflow this
    /// graph was built from.
    pub fn get<'w>(&self, workflow: &'w Workflow, id: &str) -> Result<&'w Node, EngineError> {
        workflow
            .nodes
            .get(self.index_of(id)?)
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }

    pub fn get_mut<'w>(
        &self,
        workflow: &'w mut Workflow,
        id: &str,
    ) -> Result<&'w mut Node, EngineError> {
        workflow
            .nodes
            .get_mut(self.index_of(id)?)
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }

    /// Edges ending at `id`, in declaration order.
    pub fn incoming(&self, id: &str) -> Result<Vec<&Edge>, EngineError> {
        let idx = self.index_of(id)?;
        Ok(self.incoming[idx].iter().map(|&e| &self.edges[e]).collect())
    }

    /// Edges starting at `id`, in declaration order.
    pub fn outgoing(&self, id: &str) -> Result<Vec<&Edge>, EngineError> {
        let idx = self.index_of(id)?;
        Ok(self.outgoing[idx].iter().map(|&e| &self.edges[e]).collect())
    }

    /// Upstream node of each incoming edge of `idx`.
    pub(crate) fn sources_of(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.sources_of[idx]
    }

    /// Downstream node of each outgoing edge of `idx`.
    pub(crate) fn targets_of(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing[idx]
            .iter()
            .map(move |&e| self.index[&self.edges[e].target])
    }

    /// Nodes without incoming edges, in declaration order.
    pub fn sources(&self) -> Vec<&str> {
        (0..self.ids.len())
            .filter(|&i| self.incoming[i].is_empty())
            .map(|i| self.ids[i].as_str())
            .collect()
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;
    use nodes::NodeKind;
    use serde_json::json;

    fn make_node(id: &str) -> Node {
        Node::new(id, NodeKind::ApiCall, json!({}))
    }

    fn make_workflow(ids: &[&str], edges: &[(&str, &str)]) -> Workflow {
        Workflow::new(
            "test",
            ids.iter().map(|id| make_node(id)).collect(),
            edges.iter().map(|(s, t)| Edge::new(*s, *t)).collect(),
        )
    }

    #[test]
    fn lookups_follow_edge_order() {
        //   A
        //  / \
        // B   C
        //  \ /
        //   D
        let workflow = make_workflow(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d")],
        );
        let graph = Graph::build(&workflow).expect("should be valid");

        let into_d: Vec<&str> = graph.incoming("d").unwrap().iter().map(|e| e.source.as_str()).collect();
        assert_eq!(into_d, vec!["c", "b"]);

        let out_of_a: Vec<&str> = graph.outgoing("a").unwrap().iter().map(|e| e.target.as_str()).collect();
        assert_eq!(out_of_a, vec!["b", "c"]);

        let d = graph.index_of("d").unwrap();
        assert_eq!(graph.sources_of(d), &[2, 1]);
        assert_eq!(graph.targets_of(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(graph.sources(), vec!["a"]);
        assert_eq!((graph.len(), graph.edge_count()), (4, 4));
    }

    #[test]
    fn get_resolves_through_the_index() {
        let mut workflow = make_workflow(&["a", "b", "c"], &[("a", "c")]);
        let graph = Graph::build(&workflow).unwrap();

        assert_eq!(graph.get(&workflow, "c").unwrap().id, "c");
        graph.get_mut(&mut workflow, "b").unwrap().data.insert("k".into(), json!(1));
        assert_eq!(workflow.nodes[1].data["k"], 1);
        assert_eq!(
            graph.get(&workflow, "zz").unwrap_err(),
            EngineError::NodeNotFound("zz".into())
        );
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let workflow = make_workflow(&["a", "a"], &[]);
        assert!(matches!(
            Graph::build(&workflow),
            Err(EngineError::DuplicateNodeId(id)) if id == "a"
        ));
    }

    #[test]
    fn edge_referencing_missing_node_is_rejected() {
        let workflow = make_workflow(&["a"], &[("a", "ghost")]);
        assert!(matches!(
            Graph::build(&workflow),
            Err(EngineError::UnknownNodeReference { node_id, side: "target" }) if node_id == "ghost"
        ));

        let workflow = make_workflow(&["a"], &[("ghost", "a")]);
        assert!(matches!(
            Graph::build(&workflow),
            Err(EngineError::UnknownNodeReference { side: "source", .. })
        ));
    }

    #[test]
    fn unknown_lookup_is_node_not_found() {
        let graph = Graph::build(&make_workflow(&["solo"], &[])).unwrap();
        assert_eq!(
            graph.incoming("nope").unwrap_err(),
            EngineError::NodeNotFound("nope".into())
        );
        assert!(graph.incoming("solo").unwrap().is_empty());
    }

    #[test]
    fn cycles_are_indexed_not_rejected() {
        let workflow = make_workflow(&["x", "y"], &[("x", "y"), ("y", "x")]);
        let graph = Graph::build(&workflow).expect("cycles are left to the resolver");
        assert!(graph.sources().is_empty());
    }
}
