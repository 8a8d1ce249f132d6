//! # Tree Mutations
//!
//! Semantic operations on the node arena.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one editor action
//! 2. **Validated**: Structure and component rules are checked first
//! 3. **Invertible**: Every mutation can produce its own inverse
//!
//! ## Mutation Semantics
//!
//! ### AddNodeTree
//! - Inserts a detached subtree (single node or a clone) under a parent
//! - The parent must be a canvas whose rules accept the subtree root
//!
//! ### MoveNode
//! - `index` is the node's final position among the new parent's children
//! - Fails if it would create a cycle
//! - Leaving a parent requires its `can_move_out`, entering one requires
//!   `can_move_in`
//!
//! ### RemoveNode
//! - Removes node and all descendants, linked slots included
//! - The root and linked slots cannot be removed on their own
//!
//! Inverses and redo go through `replay`, which skips the rules above but
//! keeps the structural checks.
//!
//! ### SetProp
//! - Atomic replacement of one dotted path inside the props record
//! - `None` removes the path

use mailcraft_document::{NodeSubtree, NodeTree, TreeError, ROOT_NODE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a subtree under a parent at index
    AddNodeTree {
        tree: NodeSubtree,
        parent_id: String,
        index: usize,
    },

    /// Move a node to a new parent at index
    MoveNode {
        node_id: String,
        new_parent_id: String,
        index: usize,
    },

    /// Remove a node and its descendants
    RemoveNode { node_id: String },

    /// Set or clear a prop at a dotted path
    SetProp {
        node_id: String,
        path: String,
        value: Option<Value>,
    },

    /// Show or hide a node
    SetHidden { node_id: String, hidden: bool },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Rule violation: {0}")]
    RuleViolation(String),

    #[error("The root node cannot be changed this way")]
    RootImmutable,

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl Mutation {
    /// Single fresh node inserted under `parent_id`
    pub fn add_node(subtree: NodeSubtree, parent_id: impl Into<String>, index: usize) -> Self {
        Mutation::AddNodeTree {
            tree: subtree,
            parent_id: parent_id.into(),
            index,
        }
    }

    /// Apply mutation to the tree with validation
    pub fn apply(&self, tree: &mut NodeTree) -> Result<(), MutationError> {
        self.validate(tree)?;
        self.replay(tree)
    }

    /// Apply without the component rules, only the structural checks.
    ///
    /// History goes through here: an inverse puts back a structure that
    /// already existed, even one the rules would not build today.
    pub fn replay(&self, tree: &mut NodeTree) -> Result<(), MutationError> {
        if let Mutation::MoveNode {
            node_id,
            new_parent_id,
            ..
        } = self
        {
            if tree.is_ancestor(node_id, new_parent_id) {
                return Err(MutationError::CycleDetected);
            }
        }

        match self {
            Mutation::AddNodeTree {
                tree: subtree,
                parent_id,
                index,
            } => {
                tree.insert_subtree(subtree.clone(), parent_id, *index)?;
            }

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => {
                tree.move_node(node_id, new_parent_id, *index)?;
            }

            Mutation::RemoveNode { node_id } => {
                tree.remove_subtree(node_id)?;
            }

            Mutation::SetProp {
                node_id,
                path,
                value,
            } => {
                let node = tree.node_mut(node_id)?;
                match value {
                    Some(value) => {
                        node.set_prop(path, value.clone());
                    }
                    None => {
                        node.remove_prop(path);
                    }
                }
            }

            Mutation::SetHidden { node_id, hidden } => {
                tree.node_mut(node_id)?.hidden = *hidden;
            }
        }

        Ok(())
    }

    /// Mutation that undoes `self`, computed against the tree before
    /// `self` is applied
    pub fn to_inverse(&self, tree: &NodeTree) -> Result<Mutation, MutationError> {
        self.validate(tree)?;

        match self {
            Mutation::AddNodeTree { tree: subtree, .. } => Ok(Mutation::RemoveNode {
                node_id: subtree.root_id.clone(),
            }),

            Mutation::MoveNode { node_id, .. } => {
                let (parent_id, index) = tree
                    .position(node_id)?
                    .ok_or_else(|| MutationError::InvalidStructure(format!(
                        "{} is not an ordered child",
                        node_id
                    )))?;
                Ok(Mutation::MoveNode {
                    node_id: node_id.clone(),
                    new_parent_id: parent_id,
                    index,
                })
            }

            Mutation::RemoveNode { node_id } => {
                let (parent_id, index) = tree
                    .position(node_id)?
                    .ok_or_else(|| MutationError::InvalidStructure(format!(
                        "{} is not an ordered child",
                        node_id
                    )))?;
                Ok(Mutation::AddNodeTree {
                    tree: tree.subtree(node_id)?,
                    parent_id,
                    index,
                })
            }

            Mutation::SetProp { node_id, path, .. } => {
                let node = tree.node(node_id)?;
                if let Some(previous) = node.prop(path) {
                    return Ok(Mutation::SetProp {
                        node_id: node_id.clone(),
                        path: path.clone(),
                        value: Some(previous.clone()),
                    });
                }

                // Writing a missing path creates intermediate objects; the
                // inverse restores the deepest prefix that already existed,
                // or drops the first segment when none did.
                let segments: Vec<&str> = path.split('.').collect();
                let restore = (1..segments.len())
                    .rev()
                    .map(|depth| segments[..depth].join("."))
                    .find_map(|prefix| node.prop(&prefix).cloned().map(|value| (prefix, value)));

                Ok(match restore {
                    Some((prefix, value)) => Mutation::SetProp {
                        node_id: node_id.clone(),
                        path: prefix,
                        value: Some(value),
                    },
                    None => Mutation::SetProp {
                        node_id: node_id.clone(),
                        path: segments[0].to_string(),
                        value: None,
                    },
                })
            }

            Mutation::SetHidden { node_id, .. } => Ok(Mutation::SetHidden {
                node_id: node_id.clone(),
                hidden: tree.node(node_id)?.hidden,
            }),
        }
    }

    /// Validate without applying
    pub fn validate(&self, tree: &NodeTree) -> Result<(), MutationError> {
        match self {
            Mutation::AddNodeTree {
                tree: subtree,
                parent_id,
                ..
            } => {
                let parent = tree
                    .get(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

                let root = subtree
                    .root()
                    .ok_or_else(|| MutationError::NodeNotFound(subtree.root_id.clone()))?;

                if let Some(taken) = subtree.nodes.keys().find(|id| tree.contains(id)) {
                    return Err(TreeError::DuplicateId(taken.clone()).into());
                }

                if !parent.can_accept(root) {
                    return Err(MutationError::RuleViolation(format!(
                        "{} cannot be placed inside {}",
                        root.label(),
                        parent.label()
                    )));
                }

                Ok(())
            }

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                ..
            } => {
                if node_id == ROOT_NODE {
                    return Err(MutationError::RootImmutable);
                }

                let node = tree
                    .get(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;

                let new_parent = tree
                    .get(new_parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(new_parent_id.clone()))?;

                if tree.is_ancestor(node_id, new_parent_id) {
                    return Err(MutationError::CycleDetected);
                }

                let old_parent_id = node
                    .parent
                    .as_deref()
                    .ok_or(MutationError::RootImmutable)?;
                let old_parent = tree
                    .get(old_parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(old_parent_id.to_string()))?;

                if old_parent.is_linked_child(node_id) {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} is a linked slot and cannot be moved",
                        node_id
                    )));
                }

                if !node.rules().can_drag {
                    return Err(MutationError::RuleViolation(format!(
                        "{} cannot be dragged",
                        node.label()
                    )));
                }

                if old_parent_id != new_parent_id.as_str() {
                    if !old_parent.rules().can_move_out {
                        return Err(MutationError::RuleViolation(format!(
                            "nodes cannot leave {}",
                            old_parent.label()
                        )));
                    }
                    if !new_parent.can_accept(node) {
                        return Err(MutationError::RuleViolation(format!(
                            "{} cannot be placed inside {}",
                            node.label(),
                            new_parent.label()
                        )));
                    }
                }

                Ok(())
            }

            Mutation::RemoveNode { node_id } => {
                if node_id == ROOT_NODE {
                    return Err(MutationError::RootImmutable);
                }

                let (parent_id, _) = tree.position(node_id)?.ok_or_else(|| {
                    MutationError::InvalidStructure(format!(
                        "{} is a linked slot and cannot be removed",
                        node_id
                    ))
                })?;

                // Locked parents keep their children
                let parent = tree.node(&parent_id)?;
                if !parent.rules().can_move_out {
                    return Err(MutationError::RuleViolation(format!(
                        "nodes cannot leave {}",
                        parent.label()
                    )));
                }

                Ok(())
            }

            Mutation::SetProp { node_id, path, .. } => {
                tree.get(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;

                if path.is_empty() || path.split('.').any(str::is_empty) {
                    return Err(MutationError::InvalidStructure(format!(
                        "invalid prop path '{}'",
                        path
                    )));
                }

                Ok(())
            }

            Mutation::SetHidden { node_id, .. } => {
                tree.get(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(())
            }
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddNodeTree { .. } => "add_node_tree",
            Mutation::MoveNode { .. } => "move_node",
            Mutation::RemoveNode { .. } => "remove_node",
            Mutation::SetProp { .. } => "set_prop",
            Mutation::SetHidden { .. } => "set_hidden",
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New version number
    pub version: u64,
}
