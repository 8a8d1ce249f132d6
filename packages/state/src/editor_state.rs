use mailcraft_document::NodeTree;
use serde::{Deserialize, Serialize};

use crate::StateError;

/// Version tag written by this editor
pub const STATE_VERSION: &str = "1.0.0";

/// The persisted document: serialized node map plus a version tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub json: String,

    /// Tokens written without a version are taken as current
    #[serde(default = "current_version")]
    pub version: String,
}

fn current_version() -> String {
    STATE_VERSION.to_string()
}

impl EditorState {
    pub fn new(json: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            version: version.into(),
        }
    }

    pub fn from_tree(tree: &NodeTree, version: impl Into<String>) -> Result<Self, StateError> {
        Ok(Self::new(tree.to_json()?, version))
    }

    /// Parse and verify the node map
    pub fn tree(&self) -> Result<NodeTree, StateError> {
        Ok(NodeTree::from_json(&self.json)?)
    }
}
