//! Run telemetry: an injected observer the engine reports to but never
//! consults.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

/// Phase a node reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Started,
    Success,
    Error,
}

/// One human-readable run event.
#[derive(Debug, Clone, Serialize)]
pub struct RunEvent {
    pub run_id: Uuid,
    pub node_id: String,
    /// Node kind tag, shown as the log label.
    pub label: String,
    pub message: String,
    pub status: EventStatus,
    pub at: DateTime<Utc>,
}

/// Receives run events. Implementations must not block.
pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent);
}

/// Emits every event as a `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_event(&self, event: &RunEvent) {
        match event.status {
            EventStatus::Error => error!(
                run_id = %event.run_id, node_id = %event.node_id, label = %event.label,
                "{}", event.message
            ),
            _ => info!(
                run_id = %event.run_id, node_id = %event.node_id, label = %event.label,
                "{}", event.message
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_event(&self, _event: &RunEvent) {}
}
