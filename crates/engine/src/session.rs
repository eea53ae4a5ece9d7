//! Session: the shared node/edge store plus the run lock.
//!
//! At most one run mutates the store at a time. Under [`RunLockPolicy::Queue`]
//! a second trigger waits for the first run to finish; under
//! [`RunLockPolicy::Reject`] it fails immediately with
//! [`EngineError::RunInProgress`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use nodes::Data;

use crate::graph::Graph;
use crate::models::Workflow;
use crate::orchestrator::{Orchestrator, RunReport};
use crate::propagation::merge_patch;
use crate::EngineError;

/// What to do when a run is triggered while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunLockPolicy {
    #[default]
    Queue,
    Reject,
}

/// A workflow under edit, shared between the editor and the engine.
#[derive(Clone)]
pub struct Session {
    workflow: Arc<Mutex<Workflow>>,
    orchestrator: Arc<Orchestrator>,
    policy: RunLockPolicy,
}

impl Session {
    pub fn new(workflow: Workflow, orchestrator: Orchestrator) -> Self {
        Self {
            workflow: Arc::new(Mutex::new(workflow)),
            orchestrator: Arc::new(orchestrator),
            policy: RunLockPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RunLockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RunLockPolicy {
        self.policy
    }

    /// Trigger a run of `target` against the shared store.
    pub async fn run(&self, target: &str, trigger: Data) -> Result<RunReport, EngineError> {
        let mut workflow = match self.policy {
            RunLockPolicy::Queue => self.workflow.lock().await,
            RunLockPolicy::Reject => self.workflow.try_lock().map_err(|_| {
                warn!(target_node = %target, "run rejected; another run is in progress");
                EngineError::RunInProgress
            })?,
        };
        self.orchestrator.run(&mut workflow, target, trigger).await
    }

    /// Run every source node (no incoming edges) in store order.
    ///
    /// Each root gets its own run and visited set; a failing root does not
    /// stop the others.
    pub async fn run_sources(&self, trigger: Data) -> Result<Vec<RunReport>, EngineError> {
        let mut workflow = self.workflow.lock().await;
        let roots: Vec<String> = Graph::build(&workflow)?
            .sources()
            .into_iter()
            .map(str::to_string)
            .collect();
        info!(roots = roots.len(), "running source nodes");

        let mut reports = Vec::with_capacity(roots.len());
        for root in &roots {
            reports.push(self.orchestrator.run(&mut workflow, root, trigger.clone()).await?);
        }
        Ok(reports)
    }

    /// A copy of the current store.
    pub async fn snapshot(&self) -> Workflow {
        self.workflow.lock().await.clone()
    }

    /// Merge an editor change into a node's data. Waits for any active run.
    pub async fn update_node_data(&self, node_id: &str, patch: &Data) -> Result<(), EngineError> {
        let mut workflow = self.workflow.lock().await;
        let graph = Graph::build(&workflow)?;
        let node = graph.get_mut(&mut workflow, node_id)?;
        merge_patch(&mut node.data, patch);
        Ok(())
    }

    /// Apply an arbitrary edit to the store while holding the run lock.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut Workflow) -> R) -> R {
        let mut workflow = self.workflow.lock().await;
        f(&mut workflow)
    }
}
