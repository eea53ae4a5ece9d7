use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::file_field;
use crate::backend::{Backend, CopyRequest};
use crate::payload::file_bytes;
use crate::traits::{Data, Invocation};
use crate::{ExecutableNode, ExecutorResult, NodeError, NodeKind};

/// Copies the node's current file into a destination database.
pub struct DestinationConnection {
    backend: Arc<dyn Backend>,
}

impl DestinationConnection {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExecutableNode for DestinationConnection {
    fn kind(&self) -> NodeKind {
        NodeKind::DestinationConnection
    }

    async fn execute(&self, inv: &Invocation<'_>) -> Result<ExecutorResult, NodeError> {
        let file = inv.object_field("file").ok_or_else(|| NodeError::missing("file"))?;
        let filename = file_field(file, "filename")?;
        let filetype = file_field(file, "filetype")?;
        let content = file_field(file, "content")?;
        let source = inv.require_i64("databaseId")?;

        // Validation happens before anything is sent.
        let bytes = file_bytes(content, filetype)?;
        debug!(node_id = inv.node_id, filename, size = bytes.len(), "copying file");

        let request = CopyRequest {
            source,
            filename: filename.to_string(),
            filetype: filetype.to_string(),
            bytes,
            url: inv.str_field("url").map(str::to_string),
        };

        match self.backend.copy_data(request).await? {
            Some(_) => Ok(ExecutorResult::success(Data::new())),
            None => {
                warn!(node_id = inv.node_id, "copy returned no data");
                Ok(ExecutorResult::no_data())
            }
        }
    }
}
