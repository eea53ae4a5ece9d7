use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::file_field;
use crate::backend::{Backend, FileUpload};
use crate::payload::file_bytes;
use crate::traits::{data_from, Data, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

const NOTEBOOK_MIME: &str = "application/x-ipynb+json";

/// Executes a Jupyter notebook on the backend.
///
/// The notebook comes from `notebook` (an uploaded file) or, failing that,
/// from a `file` that still carries content (a file selected upstream).
pub struct NotebookExecute {
    backend: Arc<dyn Backend>,
}

impl NotebookExecute {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

fn notebook_file<'a>(inv: &Invocation<'a>) -> Option<&'a Data> {
    inv.object_field("notebook").or_else(|| {
        inv.object_field("file")
            .filter(|file| file.get("content").is_some_and(Value::is_string))
    })
}

#[async_trait]
impl ExecutableNode for NotebookExecute {
    fn kind(&self) -> NodeKind {
        NodeKind::NotebookExecute
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let notebook = notebook_file(inv).ok_or_else(|| NodeError::missing("notebook"))?;
        let content = file_field(notebook, "content")?;
        let filename = match inv.str_field("fileName") {
            Some(name) => name,
            None => file_field(notebook, "filename")?,
        };
        let filetype = notebook
            .get("filetype")
            .and_then(Value::as_str)
            .unwrap_or(NOTEBOOK_MIME);

        let upload = FileUpload {
            filename: filename.to_string(),
            filetype: filetype.to_string(),
            bytes: file_bytes(content, filetype)?,
        };

        let Some(response) = self.backend.compile_notebook(upload).await? else {
            warn!(node_id = inv.node_id, "notebook run returned no data");
            return Ok(ExecutorResult::no_data());
        };

        let error_details = response.get("error_details").filter(|v| !v.is_null());
        let patch = data_from(json!({
            "file": {
                "message": response.get("message"),
                "successfulCell": response.get("last_successful_cell"),
                "errorDetails": error_details,
            }
        }));

        // The call went through but a cell failed: keep the detail for display.
        if let Some(details) = error_details {
            warn!(node_id = inv.node_id, %details, "notebook reported a failing cell");
            return Ok(ExecutorResult::failure(patch));
        }
        Ok(ExecutorResult::success(patch))
    }
}
