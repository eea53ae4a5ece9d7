//! `MockNode`: a scripted test double for `ExecutableNode`.
//!
//! One [`MockScript`] decides the outcome per node id and records every call,
//! so a single script can back all seven kinds in a registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::{data_from, Data, Invocation};
use crate::{BackendError, ExecutableNode, ExecutorResult, NodeError, NodeKind, NodeRegistry};

/// What a scripted node does when executed.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// `ok = true` with this patch.
    Succeed(Data),
    /// `ok = false` with this patch.
    Fail(Data),
    /// Raise an external-call error.
    Raise(String),
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub node_id: String,
    pub config: Data,
    pub input: Data,
}

/// Per-node outcomes plus the shared call log.
///
/// Nodes without a scripted outcome succeed with `{ "node": <id> }`.
#[derive(Debug, Default)]
pub struct MockScript {
    outcomes: HashMap<String, MockBehaviour>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, node_id: &str, patch: Value) -> Self {
        self.outcomes
            .insert(node_id.to_string(), MockBehaviour::Succeed(data_from(patch)));
        self
    }

    pub fn failing(mut self, node_id: &str, patch: Value) -> Self {
        self.outcomes
            .insert(node_id.to_string(), MockBehaviour::Fail(data_from(patch)));
        self
    }

    pub fn raising(mut self, node_id: &str, msg: impl Into<String>) -> Self {
        self.outcomes
            .insert(node_id.to_string(), MockBehaviour::Raise(msg.into()));
        self
    }

    /// A registry with a `MockNode` for every kind, all driven by this script.
    pub fn into_registry(self) -> (NodeRegistry, Arc<MockScript>) {
        let script = Arc::new(self);
        let mut registry = NodeRegistry::new();
        for kind in NodeKind::ALL {
            registry.register(Arc::new(MockNode::new(kind, script.clone())));
        }
        (registry, script)
    }

    /// Node ids in the order they were executed.
    pub fn executed(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.node_id.clone()).collect()
    }

    /// Number of times a node has been executed.
    pub fn call_count(&self, node_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.node_id == node_id)
            .count()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// A mock executor for one kind.
pub struct MockNode {
    kind: NodeKind,
    script: Arc<MockScript>,
}

impl MockNode {
    pub fn new(kind: NodeKind, script: Arc<MockScript>) -> Self {
        Self { kind, script }
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        self.script.calls.lock().unwrap().push(MockCall {
            node_id: inv.node_id.to_string(),
            config: inv.config.clone(),
            input: inv.input.clone(),
        });

        match self.script.outcomes.get(inv.node_id) {
            Some(MockBehaviour::Succeed(patch)) => Ok(ExecutorResult::success(patch.clone())),
            Some(MockBehaviour::Fail(patch)) => Ok(ExecutorResult::failure(patch.clone())),
            Some(MockBehaviour::Raise(msg)) => {
                Err(NodeError::ExternalCall(BackendError::Malformed(msg.clone())))
            }
            None => Ok(ExecutorResult::success(data_from(json!({ "node": inv.node_id })))),
        }
    }
}
