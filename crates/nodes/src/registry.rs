//! Kind-indexed executor table, built once at startup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::activities::{
    ApiCall, DatabaseConnection, DestinationConnection, FileManagement, FolderUpload,
    NotebookExecute, SchedulingToggle,
};
use crate::backend::Backend;
use crate::traits::Invocation;
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Maps each [`NodeKind`] to the executor that runs it.
#[derive(Default, Clone)]
pub struct NodeRegistry {
    executors: HashMap<NodeKind, Arc<dyn ExecutableNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All seven built-in activities, sharing one backend.
    pub fn builtin(backend: Arc<dyn Backend>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DatabaseConnection::new(backend.clone())));
        registry.register(Arc::new(FileManagement::new(backend.clone())));
        registry.register(Arc::new(DestinationConnection::new(backend.clone())));
        registry.register(Arc::new(ApiCall::new(backend.clone())));
        registry.register(Arc::new(NotebookExecute::new(backend.clone())));
        registry.register(Arc::new(FolderUpload::new(backend.clone())));
        registry.register(Arc::new(SchedulingToggle::new(backend)));
        registry
    }

    /// Register an executor under its own kind, returning the one it replaced.
    pub fn register(&mut self, executor: Arc<dyn ExecutableNode>) -> Option<Arc<dyn ExecutableNode>> {
        self.executors.insert(executor.kind(), executor)
    }

    pub fn get(&self, kind: NodeKind) -> Option<&Arc<dyn ExecutableNode>> {
        self.executors.get(&kind)
    }

    /// Dispatch one invocation to the executor for `kind`.
    pub async fn execute(
        &self,
        kind: NodeKind,
        invocation: &Invocation<'_>,
    ) -> Result<ExecutorResult, NodeError> {
        let executor = self.get(kind).ok_or(NodeError::Unregistered(kind))?;
        debug!(node_id = invocation.node_id, %kind, "dispatching node");
        executor.execute(invocation).await
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.executors.keys().map(|k| k.tag()).collect();
        kinds.sort_unstable();
        f.debug_struct("NodeRegistry").field("kinds", &kinds).finish()
    }
}
