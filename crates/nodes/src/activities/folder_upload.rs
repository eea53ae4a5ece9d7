use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::file_field;
use crate::backend::{Backend, FileUpload};
use crate::payload::file_bytes;
use crate::traits::{data_from, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Uploads a user-selected file to a destination.
pub struct FolderUpload {
    backend: Arc<dyn Backend>,
}

impl FolderUpload {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExecutableNode for FolderUpload {
    fn kind(&self) -> NodeKind {
        NodeKind::FolderUpload
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let Some(file) = inv.object_field("file") else {
            warn!(node_id = inv.node_id, "no file selected");
            return Ok(ExecutorResult::no_data());
        };
        let filename = file_field(file, "filename")?;
        let content = file_field(file, "content")?;
        let filetype = file
            .get("filetype")
            .and_then(Value::as_str)
            .unwrap_or("application/octet-stream");
        let destination = inv.require_i64("databaseId")?;

        let upload = FileUpload {
            filename: filename.to_string(),
            filetype: filetype.to_string(),
            bytes: file_bytes(content, filetype)?,
        };

        if self.backend.upload_file(destination, upload).await?.is_none() {
            warn!(node_id = inv.node_id, "upload returned no data");
            return Ok(ExecutorResult::no_data());
        }

        Ok(ExecutorResult::success(data_from(json!({
            "file": { "filename": filename, "filetype": filetype, "content": content }
        }))))
    }
}
