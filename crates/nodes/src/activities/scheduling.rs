use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backend::{Backend, ScheduleRequest};
use crate::traits::{Data, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// How a copy activity is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    Event,
    Tumbling,
    Scheduler,
}

impl ScheduleMode {
    /// Label sent to the backend.
    pub fn label(self) -> &'static str {
        match self {
            Self::Event => "Event Based",
            Self::Tumbling => "Tumbling Window",
            Self::Scheduler => "Scheduler",
        }
    }
}

impl FromStr for ScheduleMode {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" | "event based" => Ok(Self::Event),
            "tumbling" | "tumbling window" => Ok(Self::Tumbling),
            "scheduler" => Ok(Self::Scheduler),
            other => Err(NodeError::Configuration(format!(
                "unknown scheduling mode '{other}'"
            ))),
        }
    }
}

/// Registers a recurring copy between two databases.
pub struct SchedulingToggle {
    backend: Arc<dyn Backend>,
}

impl SchedulingToggle {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExecutableNode for SchedulingToggle {
    fn kind(&self) -> NodeKind {
        NodeKind::SchedulingToggle
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let mode = match inv.str_field("selectedOption") {
            Some(option) => option.parse()?,
            None => ScheduleMode::Event,
        };

        let source = inv.require_i64("databaseId")?;
        // Only databases 1 and 2 exist; any other id maps to 1.
        let destination = if source == 1 { 2 } else { 1 };

        let request = ScheduleRequest {
            source,
            destination,
            label: mode.label().to_string(),
            interval: match mode {
                ScheduleMode::Tumbling => Some(inv.require_i64("copyCount")?),
                _ => None,
            },
            schedular: match mode {
                ScheduleMode::Scheduler => Some(inv.require_i64("schedulerTime")?),
                _ => None,
            },
        };
        debug!(node_id = inv.node_id, ?request, "registering schedule");

        match self.backend.register_schedule(request).await? {
            Some(_) => Ok(ExecutorResult::success(Data::new())),
            None => {
                warn!(node_id = inv.node_id, "schedule registration returned no data");
                Ok(ExecutorResult::no_data())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::test_support::run;
    use crate::backend::fake::{Call, FakeBackend};
    use serde_json::json;

    async fn scheduled(config: serde_json::Value) -> ScheduleRequest {
        let backend = Arc::new(FakeBackend::new().replying("schedule", json!({ "ok": true })));
        let result = run(&SchedulingToggle::new(backend.clone()), config, json!({}))
            .await
            .unwrap();
        assert!(result.ok);
        match backend.calls().remove(0) {
            Call::Schedule(req) => req,
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn modes_parse_short_and_long_names() {
        assert_eq!("event".parse::<ScheduleMode>().unwrap(), ScheduleMode::Event);
        assert_eq!("Tumbling Window".parse::<ScheduleMode>().unwrap(), ScheduleMode::Tumbling);
        assert_eq!("SCHEDULER".parse::<ScheduleMode>().unwrap(), ScheduleMode::Scheduler);
        assert!("hourly".parse::<ScheduleMode>().is_err());
    }

    #[tokio::test]
    async fn destination_is_the_other_database() {
        let req = scheduled(json!({ "selectedOption": "event", "databaseId": 1 })).await;
        assert_eq!((req.source, req.destination), (1, 2));
        assert_eq!(req.label, "Event Based");
        assert_eq!((req.interval, req.schedular), (None, None));

        let req = scheduled(json!({ "selectedOption": "event", "databaseId": 2 })).await;
        assert_eq!((req.source, req.destination), (2, 1));
    }

    #[tokio::test]
    async fn ids_outside_one_and_two_map_to_one() {
        let req = scheduled(json!({ "databaseId": 5 })).await;
        assert_eq!((req.source, req.destination), (5, 1));
    }

    #[tokio::test]
    async fn interval_fields_follow_the_mode() {
        let req = scheduled(json!({
            "selectedOption": "tumbling", "databaseId": 1, "copyCount": 3, "schedulerTime": 9
        }))
        .await;
        assert_eq!((req.interval, req.schedular), (Some(3), None));

        let req = scheduled(json!({
            "selectedOption": "Scheduler", "databaseId": 1, "schedulerTime": "15"
        }))
        .await;
        assert_eq!((req.interval, req.schedular), (None, Some(15)));
    }

    #[tokio::test]
    async fn scheduler_mode_requires_a_time() {
        let backend = Arc::new(FakeBackend::new());
        let err = run(
            &SchedulingToggle::new(backend.clone()),
            json!({ "selectedOption": "scheduler", "databaseId": 1 }),
            json!({}),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, NodeError::Configuration(msg) if msg.contains("schedulerTime")));
        assert!(backend.calls().is_empty());
    }
}
