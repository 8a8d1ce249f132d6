//! # Mailcraft Document
//!
//! Node arena for email templates.
//!
//! A document is a flat map of nodes keyed by id. The fixed `ROOT` node is
//! the email body; every other node has exactly one parent and is reachable
//! either through its parent's ordered `nodes` list or through a named
//! linked slot (one per column of a multi-column container).
//!
//! ```text
//! ROOT (BodyWrapper)
//!  └── main (Container, canvas)
//!       ├── a1b2c3 (Text)
//!       └── d4e5f6 (Container, containerType = 2)
//!            ├── [column0] (Resizer, canvas)
//!            └── [column1] (Resizer, canvas)
//! ```
//!
//! The serialized form is the drag-and-drop framework's JSON map, so
//! documents produced by the browser editor load without conversion.

mod error;
mod id_generator;
mod kind;
mod node;
mod serialized;
mod tree;

pub use error::{TreeError, TreeResult};
pub use id_generator::IdGenerator;
pub use kind::{ComponentKind, NodeRules};
pub use node::{Node, NodeId};
pub use serialized::{ResolvedType, SerializedNode};
pub use tree::{NodeSubtree, NodeTree, MAIN_NODE, ROOT_NODE};
