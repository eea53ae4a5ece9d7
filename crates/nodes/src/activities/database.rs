use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{Backend, SourceRequest};
use crate::traits::{data_from, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Lists the files of a source, either by database id or by raw URL.
pub struct DatabaseConnection {
    backend: Arc<dyn Backend>,
}

impl DatabaseConnection {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExecutableNode for DatabaseConnection {
    fn kind(&self) -> NodeKind {
        NodeKind::DatabaseConnection
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let database_id = inv.i64_field("databaseId");

        let response = match inv.str_field("url") {
            Some(url) => {
                debug!(node_id = inv.node_id, url, "fetching source by url");
                self.backend.fetch_source_by_url(url.to_string()).await?
            }
            None => {
                let request = SourceRequest {
                    database: inv.require_str("selectedDatabase")?.to_string(),
                    database_id: database_id.ok_or_else(|| NodeError::missing("databaseId"))?,
                    location: inv.require_str("location")?.to_string(),
                };
                debug!(node_id = inv.node_id, ?request, "fetching source by id");
                self.backend.fetch_source_by_id(request).await?
            }
        };

        let files = match response {
            Some(Value::Array(files)) if !files.is_empty() => files,
            _ => {
                warn!(node_id = inv.node_id, "source returned no files");
                return Ok(ExecutorResult::no_data());
            }
        };

        let files: Vec<Value> = files
            .iter()
            .map(|file| {
                json!({
                    "id": file.get("id"),
                    "filename": file.get("filename"),
                    "content": file.get("content"),
                    "fileType": file.get("fileType"),
                    "databaseId": database_id,
                })
            })
            .collect();

        Ok(ExecutorResult::success(data_from(json!({ "files": files }))))
    }
}
