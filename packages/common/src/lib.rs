//! Shared plumbing for the service crates: the common error type, the
//! file system seam used by exports and settings, and a tree visitor.

pub mod error;
pub mod filesystem;
pub mod visitor;

pub use error::*;
pub use filesystem::*;
pub use visitor::*;
