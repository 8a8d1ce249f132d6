//! File export and import.
//!
//! Every export checks its input before touching the file system, so a
//! failed export never leaves a partial file behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mailcraft_common::FileSystem;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{EditorState, TransferError};

pub const DEFAULT_FILENAME: &str = "email-template";

/// Wrap rendered HTML in a standalone email document with the usual
/// client compatibility styles
pub fn email_template(html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="X-UA-Compatible" content="ie=edge">
    <title>Email Template</title>
    <style>
        /* Email client compatibility styles */
        body, table, td, p, a, li, blockquote {{
            -webkit-text-size-adjust: 100%;
            -ms-text-size-adjust: 100%;
        }}
        table, td {{
            mso-table-lspace: 0pt;
            mso-table-rspace: 0pt;
        }}
        img {{
            -ms-interpolation-mode: bicubic;
            border: 0;
            outline: none;
            text-decoration: none;
        }}
    </style>
</head>
<body style="margin: 0; padding: 0; background-color: #f5f5f5;">
    {html}
</body>
</html>"#
    )
}

/// `{prefix}-YYYY-MM-DDTHH-MM-SS` for the current UTC time
pub fn generate_filename(prefix: &str) -> String {
    generate_filename_at(prefix, Utc::now())
}

pub fn generate_filename_at(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.format("%Y-%m-%dT%H-%M-%S"))
}

/// A successfully imported `.json` file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub data: Value,
    pub filename: String,
}

/// Export/import against a file system, writing into `out_dir`
pub struct ExportImportService<F: FileSystem> {
    fs: F,
    out_dir: PathBuf,
}

impl<F: FileSystem> ExportImportService<F> {
    pub fn new(fs: F, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            out_dir: out_dir.into(),
        }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write `{filename}.json` with the state pretty printed.
    ///
    /// The `json` string is expanded into an object when it parses.
    pub fn export_as_json(
        &self,
        state: Option<&EditorState>,
        filename: &str,
    ) -> Result<PathBuf, TransferError> {
        let state = state.ok_or(TransferError::NoEditorState)?;

        let export = match serde_json::from_str::<Value>(&state.json) {
            Ok(json) => json!({ "json": json, "version": state.version }),
            Err(e) => {
                error!(error = %e, "Stored json is not JSON, exporting it verbatim");
                serde_json::to_value(state)?
            }
        };

        let contents = serde_json::to_string_pretty(&export)?;
        self.write(format!("{}.json", filename), &contents)
    }

    /// Write the rendered HTML as `{filename}.html`
    pub fn export_as_html(&self, html: &str, filename: &str) -> Result<PathBuf, TransferError> {
        if html.is_empty() {
            return Err(TransferError::NoHtmlContent);
        }
        self.write(format!("{}.html", filename), html)
    }

    /// Write the HTML wrapped in the email shell as
    /// `{filename}-email-template.html`
    pub fn export_as_email_template(
        &self,
        html: &str,
        filename: &str,
    ) -> Result<PathBuf, TransferError> {
        if html.is_empty() {
            return Err(TransferError::NoHtmlContent);
        }
        self.write(
            format!("{}-email-template.html", filename),
            &email_template(html),
        )
    }

    fn write(&self, name: String, contents: &str) -> Result<PathBuf, TransferError> {
        let path = self.out_dir.join(name);
        self.fs
            .write(&path, contents)
            .map_err(|source| TransferError::Write {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), bytes = contents.len(), "Exported file");
        Ok(path)
    }

    /// Read and parse a `.json` file
    pub fn import_from_json(&self, path: Option<&Path>) -> Result<ImportedFile, TransferError> {
        let path = path.ok_or(TransferError::NoFileSelected)?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(TransferError::InvalidFileType);
        }

        let text = self.fs.read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                TransferError::NotText
            } else {
                TransferError::Unreadable(e)
            }
        })?;

        let data = serde_json::from_str(&text).map_err(TransferError::InvalidJson)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(file = %filename, "Imported JSON");
        Ok(ImportedFile { data, filename })
    }
}
