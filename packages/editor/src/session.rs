//! # Edit Session Management
//!
//! One client's view of a document: the current selection, the undo
//! history and the id generator used for new nodes.
//!
//! Toolbar actions act on the selected node. With nothing selected they
//! do nothing and report it (`Ok(false)` / `Ok(None)`), like the buttons
//! that are simply inert in that state.

use crate::actions;
use crate::{Document, EditorError, Mutation, MutationResult, UndoStack};
use mailcraft_document::{ComponentKind, IdGenerator, NodeId, NodeSubtree, NodeTree};
use serde_json::Value;
use tracing::{debug, info};

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    history: UndoStack,
    ids: IdGenerator,
    selected: Option<NodeId>,
}

impl EditSession {
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self::with_ids(id, document, IdGenerator::random())
    }

    /// Session with a caller supplied id generator (seeded in tests)
    pub fn with_ids(id: impl Into<String>, document: Document, ids: IdGenerator) -> Self {
        Self {
            id: id.into(),
            document,
            history: UndoStack::new(),
            ids,
            selected: None,
        }
    }

    pub fn tree(&self) -> &NodeTree {
        self.document.tree()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Replace the document contents; history and selection start over
    pub fn load(&mut self, tree: NodeTree) {
        info!(session = %self.id, nodes = tree.len(), "Loading document");
        self.document.replace_tree(tree);
        self.history.clear();
        self.selected = None;
    }

    pub fn select(&mut self, node_id: &str) -> Result<(), EditorError> {
        self.tree().node(node_id)?;
        self.selected = Some(node_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Apply a mutation and record its inverse
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let inverse = mutation.to_inverse(self.document.tree())?;
        let result = self.document.apply(&mutation)?;
        self.history.record(mutation, inverse);
        self.drop_stale_selection();
        Ok(result)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.history.undo(self.document.edit_tree()?)?;
        if undone {
            self.document.touch();
            self.drop_stale_selection();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.history.redo(self.document.edit_tree()?)?;
        if redone {
            self.document.touch();
            self.drop_stale_selection();
        }
        Ok(redone)
    }

    // A removed node cannot stay selected
    fn drop_stale_selection(&mut self) {
        if let Some(selected) = &self.selected {
            if !self.document.tree().contains(selected) {
                self.selected = None;
            }
        }
    }

    /// Insert a fresh node of `kind` under `parent_id` and return its id
    pub fn insert_child(
        &mut self,
        kind: ComponentKind,
        parent_id: &str,
        index: usize,
    ) -> Result<NodeId, EditorError> {
        let subtree = NodeSubtree::fresh(
            kind,
            kind.is_canvas(),
            self.document.tree(),
            &mut self.ids,
        );
        let id = subtree.root_id.clone();
        self.apply(Mutation::add_node(subtree, parent_id, index))?;
        Ok(id)
    }

    pub fn move_up(&mut self) -> Result<bool, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(false);
        };
        match actions::move_up(self.tree(), &current)? {
            Some(mutation) => self.apply(mutation).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn move_down(&mut self) -> Result<bool, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(false);
        };
        match actions::move_down(self.tree(), &current)? {
            Some(mutation) => self.apply(mutation).map(|_| true),
            None => Ok(false),
        }
    }

    /// Add a node next to the selection inside `target_parent`
    pub fn add_node(
        &mut self,
        kind: ComponentKind,
        target_parent: &str,
        insert_after: bool,
        is_canvas: bool,
    ) -> Result<Option<NodeId>, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(None);
        };

        let mutation = actions::add_node(
            self.document.tree(),
            &mut self.ids,
            &current,
            kind,
            target_parent,
            insert_after,
            is_canvas,
        )?;
        let id = added_root(&mutation);
        self.apply(mutation)?;
        Ok(id)
    }

    /// Duplicate the selection; returns the id of the copy
    pub fn duplicate_node(&mut self) -> Result<Option<NodeId>, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(None);
        };

        let mutation = actions::duplicate_node(self.document.tree(), &mut self.ids, &current)?;
        let id = added_root(&mutation);
        self.apply(mutation)?;
        self.history.describe_last("Duplicate");
        debug!(original = %current, copy = ?id, "Duplicated node");
        Ok(id)
    }

    pub fn delete_selected(&mut self) -> Result<bool, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(false);
        };
        self.apply(Mutation::RemoveNode { node_id: current })?;
        Ok(true)
    }

    /// Set a prop on the selection; `None` clears it
    pub fn set_prop(&mut self, path: &str, value: Option<Value>) -> Result<bool, EditorError> {
        let Some(current) = self.selected.clone() else {
            return Ok(false);
        };
        self.apply(Mutation::SetProp {
            node_id: current,
            path: path.to_string(),
            value,
        })?;
        Ok(true)
    }
}

fn added_root(mutation: &Mutation) -> Option<NodeId> {
    match mutation {
        Mutation::AddNodeTree { tree, .. } => Some(tree.root_id.clone()),
        _ => None,
    }
}
