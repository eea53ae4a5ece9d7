//! Built-in activity executors, one per [`NodeKind`](crate::NodeKind).

mod api_call;
mod database;
mod destination;
mod file_management;
mod folder_upload;
mod notebook;
mod scheduling;

pub use api_call::ApiCall;
pub use database::DatabaseConnection;
pub use destination::DestinationConnection;
pub use file_management::FileManagement;
pub use folder_upload::FolderUpload;
pub use notebook::NotebookExecute;
pub use scheduling::{ScheduleMode, SchedulingToggle};

use serde_json::Value;

use crate::{traits::Data, NodeError};

/// A required string member of a nested file descriptor (`file.filename`, ...).
fn file_field<'a>(file: &'a Data, key: &str) -> Result<&'a str, NodeError> {
    file.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| NodeError::missing(&format!("file.{key}")))
}
