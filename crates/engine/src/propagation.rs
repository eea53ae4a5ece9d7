//! Data propagation: writing a node's output into its own data and into
//! the data of its direct successors.
//!
//! Propagation never executes anything. A successor reads the forwarded
//! fields the next time a run reaches it.

use nodes::Data;

use crate::graph::{Graph, NodeIndex};
use crate::models::Workflow;

/// Key owned by the orchestrator; patches never overwrite it.
const STATUS_KEY: &str = "status";

/// Shallow merge: keys in `patch` overwrite, other keys are left untouched.
pub fn merge_patch(target: &mut Data, patch: &Data) {
    for (key, value) in patch {
        if key == STATUS_KEY {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Merge `patch` into node `idx` and forward it along every outgoing edge.
///
/// Returns the successors that received data.
pub(crate) fn propagate(
    workflow: &mut Workflow,
    graph: &Graph,
    idx: NodeIndex,
    patch: &Data,
) -> Vec<NodeIndex> {
    merge_patch(&mut workflow.nodes[idx].data, patch);

    let targets: Vec<NodeIndex> = graph.targets_of(idx).collect();
    for &target in &targets {
        merge_patch(&mut workflow.nodes[target].data, patch);
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};
    use nodes::traits::data_from;
    use nodes::NodeKind;
    use serde_json::json;

    #[test]
    fn merge_is_shallow_and_later_keys_win() {
        let mut data = data_from(json!({ "file": { "a": 1, "b": 2 }, "keep": true }));
        merge_patch(&mut data, &data_from(json!({ "file": { "a": 9 }, "new": 1 })));

        assert_eq!(data["file"], json!({ "a": 9 }));
        assert_eq!(data["keep"], true);
        assert_eq!(data["new"], 1);
    }

    #[test]
    fn status_is_never_patched() {
        let mut data = data_from(json!({ "x": 1 }));
        merge_patch(&mut data, &data_from(json!({ "status": "success", "x": 2 })));
        assert!(!data.contains_key("status"));
        assert_eq!(data["x"], 2);
    }

    #[test]
    fn patch_reaches_self_and_direct_successors_only() {
        let mut workflow = Workflow::new(
            "p",
            vec![
                Node::new("1", NodeKind::DatabaseConnection, json!({ "databaseId": 1 })),
                Node::new("2", NodeKind::FileManagement, json!({ "format": "csv" })),
                Node::new("3", NodeKind::DestinationConnection, json!({})),
                Node::new("4", NodeKind::ApiCall, json!({})),
            ],
            vec![Edge::new("1", "2"), Edge::new("2", "3"), Edge::new("1", "4")],
        );
        let graph = Graph::build(&workflow).unwrap();

        let reached = propagate(&mut workflow, &graph, 0, &data_from(json!({ "files": [1] })));

        assert_eq!(reached, vec![1, 3]);
        assert_eq!(workflow.nodes[0].data["files"], json!([1]));
        assert_eq!(workflow.nodes[0].data["databaseId"], 1);
        assert_eq!(workflow.nodes[1].data["files"], json!([1]));
        assert_eq!(workflow.nodes[1].data["format"], "csv");
        assert_eq!(workflow.nodes[3].data["files"], json!([1]));
        assert!(workflow.nodes[2].data.is_empty(), "grandchildren are not touched");
    }
}
