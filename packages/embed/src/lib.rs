//! # Mailcraft Embed
//!
//! Host side of the editor when it runs inside a parent page. The parent
//! talks to it with `{message, value}` envelopes:
//!
//! ```text
//! parent                         editor
//!   │ loadEditor <token>  ──►      decode, load (empty on failure)
//!   │                     ◄──  editorLoaded true
//!   │ fetchState          ──►      serialize, encode, render html
//!   │                     ◄──  savedState {html, state}
//! ```
//!
//! Messages from any origin the parent URL does not contain are dropped.

mod error;
mod host;
mod protocol;
mod pump;

pub use error::EmbedError;
pub use host::{EmbedHost, FetchJob, HostAction};
pub use protocol::{origin_allowed, Inbound, Outbound, SavedState};
pub use pump::{pump, InboundEvent};
