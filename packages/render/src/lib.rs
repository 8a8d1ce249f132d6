//! # Mailcraft Render
//!
//! Turning a document into something to look at:
//!
//! - `RenderClient` posts the node map to the HTML render service
//! - `preview` scans rendered HTML for `{{placeholders}}`, builds a data
//!   skeleton and fills the template with Handlebars
//! - `FetchLatch` keeps at most one render request in flight

mod client;
mod error;
mod latch;
mod preview;

pub use client::{RenderClient, RenderConfig, LEGACY_RENDER_URL_ENV, RENDER_URL_ENV};
pub use error::{PreviewError, RenderError};
pub use latch::{FetchLatch, LatchState};
pub use preview::{
    apply_preview, extract_placeholders, placeholder_skeleton, Preview, DATA_APPLIED,
};
