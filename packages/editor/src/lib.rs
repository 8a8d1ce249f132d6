//! # Mailcraft Editor
//!
//! Document editing engine for email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: node arena + serialized form      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Apply mutations with validation          │
//! │  - Undo/redo via recorded inverses          │
//! │  - Targeted actions (move/add/duplicate)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ state / render: encode, export, HTML        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The arena is the source of truth**: serialized JSON and HTML are
//!    derived views
//! 2. **Every edit is a `Mutation`**: no ad hoc tree walks outside this crate
//! 3. **Every mutation has an inverse**: recorded before it is applied
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_editor::{Document, EditSession};
//! use mailcraft_document::{ComponentKind, MAIN_NODE};
//!
//! let mut session = EditSession::new("local", Document::new());
//! let text = session
//!     .insert_child(ComponentKind::Text, MAIN_NODE, 0)?;
//! session.select(&text)?;
//! session.duplicate_node()?;
//! session.undo()?;
//! ```

mod actions;
mod document;
mod errors;
mod mutations;
mod session;
mod undo_stack;

pub use actions::{add_node, clone_subtree, duplicate_node, move_down, move_up};
pub use document::Document;
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use session::EditSession;
pub use undo_stack::{HistoryEntry, UndoStack};

// Re-export document types for convenience
pub use mailcraft_document::{ComponentKind, NodeId, NodeSubtree, NodeTree};
