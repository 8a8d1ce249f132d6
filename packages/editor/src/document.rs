//! # Document Handle
//!
//! One email template and its editing state.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Decode → Edit → Serialize → Save
//!   ↓       ↓       ↓        ↓         ↓
//! State   Tree  Mutations   JSON   state + html
//! ```

use crate::{EditorError, Mutation, MutationResult};
use mailcraft_document::{NodeTree, TreeResult};
use tracing::debug;

/// Version tag written next to every saved document
pub const DEFAULT_STATE_VERSION: &str = "1.0.0";

/// Editable email template document
#[derive(Debug, Clone)]
pub struct Document {
    /// Current version number (increments on each applied mutation)
    pub version: u64,

    /// Format version carried through save/export
    pub state_version: String,

    tree: NodeTree,
    dirty: bool,
    enabled: bool,
}

impl Document {
    /// The default frame: body wrapper with an empty Main container
    pub fn new() -> Self {
        Self::from_tree(NodeTree::empty_document())
    }

    pub fn from_tree(tree: NodeTree) -> Self {
        Self {
            version: 0,
            state_version: DEFAULT_STATE_VERSION.to_string(),
            tree,
            dirty: false,
            enabled: true,
        }
    }

    /// Load a serialized node map
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(Self::from_tree(NodeTree::from_json(json)?))
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Apply a mutation. The version only moves when the mutation succeeds.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        if !self.enabled {
            return Err(EditorError::ReadOnly);
        }

        mutation.apply(&mut self.tree)?;
        self.touch();
        debug!(mutation = mutation.name(), version = self.version, "Applied mutation");

        Ok(MutationResult {
            version: self.version,
        })
    }

    /// Mutable access for history replay; counts as an edit
    pub(crate) fn edit_tree(&mut self) -> Result<&mut NodeTree, EditorError> {
        if !self.enabled {
            return Err(EditorError::ReadOnly);
        }
        Ok(&mut self.tree)
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.dirty = true;
    }

    /// Replace the whole tree, as when a saved state is loaded
    pub fn replace_tree(&mut self, tree: NodeTree) {
        self.tree = tree;
        self.touch();
    }

    /// Serialized node map
    pub fn serialize(&self) -> TreeResult<String> {
        self.tree.to_json()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Disabled documents reject every edit
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
