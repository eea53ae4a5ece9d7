//! The closed set of activity node kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of a workflow node. Serialized with the tags the editor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "databaseConnection")]
    DatabaseConnection,
    #[serde(rename = "fileManagement")]
    FileManagement,
    #[serde(rename = "destinationConnection")]
    DestinationConnection,
    #[serde(rename = "apiCall")]
    ApiCall,
    #[serde(rename = "jupyterNotebookExecute")]
    NotebookExecute,
    #[serde(rename = "folderUploadNode")]
    FolderUpload,
    #[serde(rename = "toggleNode")]
    SchedulingToggle,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::DatabaseConnection,
        NodeKind::FileManagement,
        NodeKind::DestinationConnection,
        NodeKind::ApiCall,
        NodeKind::NotebookExecute,
        NodeKind::FolderUpload,
        NodeKind::SchedulingToggle,
    ];

    /// The tag used in workflow documents.
    pub fn tag(self) -> &'static str {
        match self {
            Self::DatabaseConnection => "databaseConnection",
            Self::FileManagement => "fileManagement",
            Self::DestinationConnection => "destinationConnection",
            Self::ApiCall => "apiCall",
            Self::NotebookExecute => "jupyterNotebookExecute",
            Self::FolderUpload => "folderUploadNode",
            Self::SchedulingToggle => "toggleNode",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_serde() {
        for kind in NodeKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.tag().to_string()));
            let back: NodeKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(serde_json::from_str::<NodeKind>("\"mlRegression\"").is_err());
    }
}
