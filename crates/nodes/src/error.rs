//! Node-level error types.

use thiserror::Error;

use crate::NodeKind;

/// Errors returned by a node's `execute` method.
///
/// Every variant stops the node it came from. The engine records the node as
/// `error` and aborts the rest of the run; nothing is retried.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required configuration field is missing or has the wrong shape.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// File content failed base64 validation before it was sent anywhere.
    #[error("payload encoding error: {0}")]
    PayloadEncoding(#[from] PayloadError),

    /// The external operation raised instead of returning a result.
    #[error("external call failed: {0}")]
    ExternalCall(#[from] BackendError),

    /// No executor is registered for this node kind.
    #[error("no executor registered for node kind '{0}'")]
    Unregistered(NodeKind),
}

impl NodeError {
    /// Shorthand for a missing required field.
    pub fn missing(field: &str) -> Self {
        Self::Configuration(format!("missing required field '{field}'"))
    }
}

/// Rejections produced by the validated base64 transform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid character {ch:?} at position {position} in base64 payload")]
    InvalidCharacter { position: usize, ch: char },

    #[error("base64 payload length {0} is not a multiple of 4")]
    InvalidLength(usize),

    #[error("base64 decode failed: {0}")]
    Decode(String),
}

/// Failures talking to the activity backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    Malformed(String),
}
