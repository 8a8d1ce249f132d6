use mailcraft_document::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from decoding, validating and converting editor state
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Document error: {0}")]
    Tree(#[from] TreeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoded state could not be decoded")]
    Decode,

    #[error("{0}")]
    Invalid(String),
}

/// Export/import failures; the display strings are shown to users as-is
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Please select a valid JSON file")]
    InvalidFileType,

    #[error("Failed to read file as text")]
    NotText,

    #[error("Error reading file")]
    Unreadable(#[source] std::io::Error),

    #[error("Invalid JSON file format")]
    InvalidJson(#[source] serde_json::Error),

    #[error("No HTML content provided")]
    NoHtmlContent,

    #[error("No editor state provided for export")]
    NoEditorState,

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
