//! Execution orchestrator: the public entry point for one run.
//!
//! `Orchestrator::run`:
//! 1. Builds the graph view and resolves the target id.
//! 2. Creates a fresh `ExecutionContext` (the visited set).
//! 3. Resolves and runs every ancestor of the target, failing fast.
//! 4. Runs the target itself if all ancestors succeeded.
//!
//! Each executed node is reset to `idle`, dispatched through the registry,
//! and then marked `success` or `error`. A node error never escapes as `Err`.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use nodes::{Data, Invocation, NodeRegistry};

use crate::graph::{Graph, NodeIndex};
use crate::models::{NodeStatus, Workflow};
use crate::observer::{EventStatus, RunEvent, RunObserver, TracingObserver};
use crate::propagation::{merge_patch, propagate};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Per-run state and output
// ---------------------------------------------------------------------------

/// Ephemeral bookkeeping for one top-level run.
#[derive(Debug)]
pub struct ExecutionContext {
    pub run_id: Uuid,
    /// Nodes already attempted in this run.
    pub visited: HashSet<NodeIndex>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            visited: HashSet::new(),
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The first node that failed in a run, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFailure {
    pub node_id: String,
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub target: String,
    /// True iff the target itself executed successfully.
    pub succeeded: bool,
    /// Node ids in the order their executors were started.
    pub executed: Vec<String>,
    pub failure: Option<NodeFailure>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs a target node after its ancestors.
///
/// Holds no per-run state, so one orchestrator can serve every run of a
/// session.
pub struct Orchestrator {
    registry: Arc<NodeRegistry>,
    observer: Arc<dyn RunObserver>,
}

impl Orchestrator {
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run `target` and everything it depends on.
    ///
    /// # Errors
    /// Only configuration problems: an invalid graph or an unknown target.
    #[instrument(skip(self, workflow, target, trigger), fields(workflow = %workflow.name, target_node = %target))]
    pub async fn run(
        &self,
        workflow: &mut Workflow,
        target: &str,
        trigger: Data,
    ) -> Result<RunReport, EngineError> {
        let graph = Graph::build(workflow)?;
        let target_idx = graph.index_of(target)?;

        let mut ctx = ExecutionContext::new();
        // The target counts as attempted so a cycle through it cannot run it early.
        ctx.visited.insert(target_idx);
        info!(run_id = %ctx.run_id, "run started");

        let mut run = Run {
            orchestrator: self,
            workflow,
            graph: &graph,
            input: &trigger,
            report: RunReport {
                run_id: ctx.run_id,
                target: target.to_string(),
                succeeded: false,
                executed: Vec::new(),
                failure: None,
            },
            ctx,
        };

        if run.resolve_ancestors(target_idx).await {
            run.report.succeeded = run.execute(target_idx).await;
        } else {
            warn!(target_node = %target, "ancestor failed; target not executed");
        }

        info!(
            run_id = %run.report.run_id,
            succeeded = run.report.succeeded,
            executed = ?run.report.executed,
            "run finished"
        );
        Ok(run.report)
    }
}

// ---------------------------------------------------------------------------
// Run: one in-flight run over a borrowed store
// ---------------------------------------------------------------------------

pub(crate) struct Run<'a> {
    pub(crate) orchestrator: &'a Orchestrator,
    pub(crate) workflow: &'a mut Workflow,
    pub(crate) graph: &'a Graph,
    pub(crate) input: &'a Data,
    pub(crate) ctx: ExecutionContext,
    pub(crate) report: RunReport,
}

impl Run<'_> {
    /// Execute one node and record the outcome. Returns the node's verdict.
    pub(crate) async fn execute(&mut self, idx: NodeIndex) -> bool {
        let node_id = self.graph.id(idx).to_string();
        let kind = self.workflow.nodes[idx].kind;
        self.workflow.nodes[idx].status = NodeStatus::Idle;
        self.report.executed.push(node_id.clone());
        self.emit(&node_id, kind.tag(), EventStatus::Started, format!("running {kind} node"));

        let outcome = {
            let node = &self.workflow.nodes[idx];
            let invocation = Invocation::new(&node.id, &node.data, self.input);
            self.orchestrator.registry.execute(kind, &invocation).await
        };

        let failure = match outcome {
            Ok(result) if result.ok => {
                let reached = propagate(self.workflow, self.graph, idx, &result.output_patch);
                debug!(node_id = %node_id, forwarded_to = reached.len(), "output propagated");
                self.workflow.nodes[idx].status = NodeStatus::Success;
                self.emit(&node_id, kind.tag(), EventStatus::Success, "completed".to_string());
                return true;
            }
            Ok(result) => {
                // Keep failure detail on the node for display; do not forward it.
                merge_patch(&mut self.workflow.nodes[idx].data, &result.output_patch);
                "executor reported failure".to_string()
            }
            Err(err) => err.to_string(),
        };

        self.workflow.nodes[idx].status = NodeStatus::Error;
        self.emit(&node_id, kind.tag(), EventStatus::Error, failure.clone());
        if self.report.failure.is_none() {
            self.report.failure = Some(NodeFailure {
                node_id,
                reason: failure,
            });
        }
        false
    }

    fn emit(&self, node_id: &str, label: &str, status: EventStatus, message: String) {
        self.orchestrator.observer.on_event(&RunEvent {
            run_id: self.ctx.run_id,
            node_id: node_id.to_string(),
            label: label.to_string(),
            message,
            status,
            at: chrono::Utc::now(),
        });
    }
}
