use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::backend::{Backend, ConvertRequest};
use crate::traits::{data_from, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Converts one source file into another format.
pub struct FileManagement {
    backend: Arc<dyn Backend>,
}

impl FileManagement {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

/// The id of the first file an upstream source forwarded.
fn first_forwarded_file(inv: &Invocation<'_>) -> Option<i64> {
    inv.field("files")?
        .as_array()?
        .first()?
        .get("id")?
        .as_i64()
}

#[async_trait]
impl ExecutableNode for FileManagement {
    fn kind(&self) -> NodeKind {
        NodeKind::FileManagement
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let id = inv
            .i64_field("selectedFileId")
            .or_else(|| first_forwarded_file(inv))
            .ok_or_else(|| NodeError::missing("selectedFileId"))?;

        let request = ConvertRequest {
            id,
            file_name: inv.require_str("fileName")?.to_string(),
            format: inv.require_str("format")?.to_string(),
            source: inv.require_i64("databaseId")?,
        };

        let response = self.backend.convert_file(request).await?;
        let converted = response
            .as_ref()
            .and_then(|v| v.get("data"))
            .and_then(Value::as_array)
            .and_then(|files| files.first());

        let Some(file) = converted else {
            warn!(node_id = inv.node_id, "conversion returned no data");
            return Ok(ExecutorResult::no_data());
        };

        Ok(ExecutorResult::success(data_from(json!({
            "file": {
                "filename": file.get("filename"),
                "filetype": file.get("filetype"),
                "content": file.get("content"),
            }
        }))))
    }
}
