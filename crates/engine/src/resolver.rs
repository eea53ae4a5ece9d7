//! Dependency resolver: depth-first, eager execution of a node's ancestors.
//!
//! For each incoming edge of a node, in edge order: skip the source if it was
//! already attempted this run, otherwise mark it, resolve its own ancestors,
//! then execute it. The first failure stops the whole walk; siblings not yet
//! reached are never started.
//!
//! The walk uses an explicit stack of frames instead of recursion. A frame
//! is popped once all of its incoming edges are handled, which is exactly
//! when its node may run.

use tracing::trace;

use crate::graph::NodeIndex;
use crate::orchestrator::Run;

struct Frame {
    node: NodeIndex,
    next_edge: usize,
}

impl Run<'_> {
    /// Run every ancestor of `target` (but not `target` itself).
    ///
    /// Returns `false` as soon as any ancestor fails.
    pub(crate) async fn resolve_ancestors(&mut self, target: NodeIndex) -> bool {
        let mut stack = vec![Frame { node: target, next_edge: 0 }];

        while let Some(frame) = stack.last_mut() {
            let next = self.graph.sources_of(frame.node).get(frame.next_edge).copied();

            if let Some(source) = next {
                frame.next_edge += 1;
                if !self.ctx.visited.insert(source) {
                    trace!(node_id = self.graph.id(source), "already attempted, skipping");
                    continue;
                }
                stack.push(Frame { node: source, next_edge: 0 });
                continue;
            }

            // All incoming edges of this frame are satisfied.
            let Some(done) = stack.pop() else { break };
            if stack.is_empty() {
                break;
            }
            if !self.execute(done.node).await {
                return false;
            }
        }
        true
    }
}
