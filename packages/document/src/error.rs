use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node {parent} references missing child {child}")]
    DanglingChild { parent: String, child: String },

    #[error("Node {node} points at missing parent {parent}")]
    DanglingParent { node: String, parent: String },

    #[error("Node {node} is listed under {listed} but its parent is {actual:?}")]
    ParentMismatch {
        node: String,
        listed: String,
        actual: Option<String>,
    },

    #[error("Node {0} is referenced more than once")]
    DuplicateReference(String),

    #[error("Node {0} is not reachable from the root")]
    Unreachable(String),

    #[error("Document has no root node")]
    MissingRoot,

    #[error("Node id already in use: {0}")]
    DuplicateId(String),

    #[error("The root node cannot be detached")]
    RootDetached,

    #[error("Node {0} is a linked slot of its parent")]
    LinkedSlot(String),

    #[error("Unknown component type: {0}")]
    UnknownComponent(String),

    #[error("Invalid document JSON: {0}")]
    Json(String),
}

impl TreeError {
    pub fn dangling_child(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::DanglingChild {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(e: serde_json::Error) -> Self {
        TreeError::Json(e.to_string())
    }
}
