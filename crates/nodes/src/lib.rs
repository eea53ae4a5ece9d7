//! `nodes` crate: the `ExecutableNode` trait and the built-in activity executors.
//!
//! Every activity implements [`ExecutableNode`]. The engine crate dispatches
//! execution through a [`NodeRegistry`], keyed by [`NodeKind`].

pub mod activities;
pub mod backend;
pub mod config;
pub mod error;
pub mod kind;
pub mod mock;
pub mod payload;
pub mod registry;
pub mod traits;

pub use backend::{Backend, HttpBackend};
pub use config::BackendConfig;
pub use error::{BackendError, NodeError, PayloadError};
pub use kind::NodeKind;
pub use registry::NodeRegistry;
pub use traits::{Data, ExecutableNode, ExecutorResult, Invocation};
