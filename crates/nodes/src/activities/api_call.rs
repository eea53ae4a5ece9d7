use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::backend::{Backend, DispatchRequest};
use crate::traits::{data_from, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Forwards a user-described HTTP request through the backend dispatcher.
pub struct ApiCall {
    backend: Arc<dyn Backend>,
}

impl ApiCall {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

/// Collect a `[{key, value}]` list into a map. Rows with a blank key are skipped.
fn key_values(list: Option<&Value>) -> BTreeMap<String, Value> {
    list.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|row| {
            let key = row.get("key")?.as_str()?.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), row.get("value").cloned().unwrap_or(Value::Null)))
        })
        .collect()
}

fn as_header_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ExecutableNode for ApiCall {
    fn kind(&self) -> NodeKind {
        NodeKind::ApiCall
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let title = inv.require_str("title")?;
        let request = DispatchRequest {
            title: title.to_string(),
            method: inv.str_field("method").unwrap_or("GET").to_uppercase(),
            url: inv.require_str("url")?.to_string(),
            headers: key_values(inv.field("headers"))
                .into_iter()
                .map(|(k, v)| (k, as_header_value(v)))
                .collect(),
            data: key_values(inv.field("data")),
        };

        let Some(response) = self.backend.dispatch(request).await? else {
            warn!(node_id = inv.node_id, "dispatch returned no data");
            return Ok(ExecutorResult::no_data());
        };

        let body = response.get("data").unwrap_or(&response);
        let filename = body
            .get("filename")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{title}.json"));
        let filetype = body
            .get("filetype")
            .and_then(Value::as_str)
            .unwrap_or("application/json");
        let content = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());

        Ok(ExecutorResult::success(data_from(json!({
            "file": { "filename": filename, "filetype": filetype, "content": content }
        }))))
    }
}
