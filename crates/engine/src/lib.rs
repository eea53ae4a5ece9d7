//! `engine` crate: the workflow store, graph view, dependency resolver and
//! the orchestrator that runs a target node after its ancestors.

pub mod error;
pub mod graph;
pub mod models;
pub mod observer;
pub mod orchestrator;
pub mod propagation;
mod resolver;
pub mod session;

pub use error::EngineError;
pub use graph::{Graph, NodeIndex};
pub use models::{Edge, Node, NodeStatus, Workflow};
pub use observer::{EventStatus, NoopObserver, RunEvent, RunObserver, TracingObserver};
pub use orchestrator::{ExecutionContext, NodeFailure, Orchestrator, RunReport};
pub use propagation::merge_patch;
pub use session::{RunLockPolicy, Session};
