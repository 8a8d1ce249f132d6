use mailcraft_document::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("SSR_EXPORT_HTML_URL is not configured")]
    NotConfigured,

    #[error("Render request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Document error: {0}")]
    Tree(#[from] TreeError),
}

/// Preview failures; the display strings are shown to users as-is
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Invalid JSON Format in Data")]
    InvalidData(#[source] serde_json::Error),

    #[error("Incorrect Handlebars Syntax")]
    BadTemplate(String),
}
