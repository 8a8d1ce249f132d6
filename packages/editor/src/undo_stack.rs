//! # Undo History
//!
//! Every edit is stored as a [`HistoryEntry`]: the mutations that were
//! applied and, for each, the inverse computed against the tree right
//! before it ran. Undo replays the inverses newest first; redo replays the
//! mutations in their original order.
//!
//! Entries normally hold one mutation. Between `begin_batch` and
//! `end_batch` everything recorded lands in a single entry, so a compound
//! edit (restyling several properties, say) undoes in one step.
//!
//! ```rust,ignore
//! let mut history = UndoStack::new();
//! history.apply(&Mutation::SetHidden { node_id: "main".into(), hidden: true }, &mut tree)?;
//! history.undo(&mut tree)?;
//! history.redo(&mut tree)?;
//! ```

use std::collections::VecDeque;

use crate::{Mutation, MutationError};
use mailcraft_document::NodeTree;
use tracing::{debug, warn};

const DEFAULT_DEPTH: usize = 100;

/// One undoable step
#[derive(Debug, Clone, Default)]
pub struct HistoryEntry {
    /// Applied mutations, oldest first
    pub forward: Vec<Mutation>,

    /// Inverse of each mutation, same order as `forward`
    pub backward: Vec<Mutation>,

    pub label: Option<String>,
}

impl HistoryEntry {
    fn push(&mut self, mutation: Mutation, inverse: Mutation) {
        self.forward.push(mutation);
        self.backward.push(inverse);
    }

    fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    fn revert(&self, tree: &mut NodeTree) -> Result<(), MutationError> {
        self.backward.iter().rev().try_for_each(|m| m.replay(tree))
    }

    fn replay(&self, tree: &mut NodeTree) -> Result<(), MutationError> {
        self.forward.iter().try_for_each(|m| m.replay(tree))
    }
}

/// Bounded undo/redo history
#[derive(Debug)]
pub struct UndoStack {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,

    /// Oldest entries are dropped beyond this many; 0 keeps everything
    depth: usize,

    open_batch: Option<HistoryEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_DEPTH)
    }

    pub fn with_max_levels(depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            depth,
            open_batch: None,
        }
    }

    /// Compute the inverse, apply `mutation` and record both
    pub fn apply(&mut self, mutation: &Mutation, tree: &mut NodeTree) -> Result<(), MutationError> {
        let inverse = mutation.to_inverse(tree)?;
        mutation.apply(tree)?;
        self.record(mutation.clone(), inverse);
        Ok(())
    }

    /// Record a mutation the caller already applied
    pub fn record(&mut self, mutation: Mutation, inverse: Mutation) {
        match self.open_batch.as_mut() {
            Some(batch) => batch.push(mutation, inverse),
            None => {
                let mut entry = HistoryEntry::default();
                entry.push(mutation, inverse);
                self.commit(entry);
            }
        }
    }

    /// Group everything recorded until `end_batch` into one step
    pub fn begin_batch(&mut self) {
        if self.open_batch.is_some() {
            warn!("Batch already open, extending it");
            return;
        }
        self.open_batch = Some(HistoryEntry::default());
    }

    pub fn end_batch(&mut self) {
        if let Some(batch) = self.open_batch.take() {
            if !batch.is_empty() {
                self.commit(batch);
            }
        }
    }

    pub fn set_batch_description(&mut self, label: impl Into<String>) {
        if let Some(batch) = self.open_batch.as_mut() {
            batch.label = Some(label.into());
        }
    }

    /// Label the newest committed step
    pub fn describe_last(&mut self, label: impl Into<String>) {
        if let Some(entry) = self.past.back_mut() {
            entry.label = Some(label.into());
        }
    }

    fn commit(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        if self.depth > 0 {
            while self.past.len() > self.depth {
                self.past.pop_front();
            }
        }
        self.future.clear();
    }

    /// Revert the newest step; `false` when there is none.
    ///
    /// The step is reverted on a copy of the tree. If any inverse fails the
    /// tree is left as it was and the step stays undoable.
    pub fn undo(&mut self, tree: &mut NodeTree) -> Result<bool, MutationError> {
        let Some(entry) = self.past.pop_back() else {
            return Ok(false);
        };
        let mut scratch = tree.clone();
        if let Err(e) = entry.revert(&mut scratch) {
            warn!(error = %e, label = ?entry.label, "Undo failed, history kept");
            self.past.push_back(entry);
            return Err(e);
        }
        *tree = scratch;
        debug!(mutations = entry.backward.len(), label = ?entry.label, "Undo");
        self.future.push(entry);
        Ok(true)
    }

    /// Reapply the newest undone step; `false` when there is none
    pub fn redo(&mut self, tree: &mut NodeTree) -> Result<bool, MutationError> {
        let Some(entry) = self.future.pop() else {
            return Ok(false);
        };
        let mut scratch = tree.clone();
        if let Err(e) = entry.replay(&mut scratch) {
            warn!(error = %e, label = ?entry.label, "Redo failed, history kept");
            self.future.push(entry);
            return Err(e);
        }
        *tree = scratch;
        debug!(mutations = entry.forward.len(), label = ?entry.label, "Redo");
        self.past.push_back(entry);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Forget all history, including an open batch
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.open_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.past.back().and_then(|entry| entry.label.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.future.last().and_then(|entry| entry.label.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
