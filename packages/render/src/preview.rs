//! Preview templating.
//!
//! The rendered HTML may carry Handlebars placeholders (`{{first_name}}`,
//! `{{{footer}}}`). Preview lists them as a JSON skeleton the user fills
//! in, then renders the HTML with that data.

use std::sync::OnceLock;

use handlebars::Handlebars;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::PreviewError;

pub const DATA_APPLIED: &str = "Data Applied";

const EMPTY_SKELETON: &str = "{\n\n}";
const TEMPLATE_NAME: &str = "preview";

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{\{\{?(.*?)\}?\}\}").ok())
        .as_ref()
}

/// Distinct placeholder names in order of first appearance.
///
/// Block helpers, closing tags, comments, partials and `else` are
/// template syntax rather than data and are skipped.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let Some(pattern) = placeholder_pattern() else {
        return keys;
    };
    for captures in pattern.captures_iter(template) {
        let key = captures
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        let is_syntax = key.is_empty()
            || key == "else"
            || key.starts_with(['#', '/', '!', '>', '^', '~']);
        if is_syntax || keys.iter().any(|k| k == key) {
            continue;
        }
        keys.push(key.to_string());
    }
    keys
}

/// Pretty JSON object with an empty string per placeholder; dotted names
/// nest (`user.name` becomes `{"user": {"name": ""}}`)
pub fn placeholder_skeleton(keys: &[String]) -> String {
    let mut root = Map::new();
    for key in keys {
        insert_path(&mut root, key);
    }

    if root.is_empty() {
        return EMPTY_SKELETON.to_string();
    }
    serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_else(|_| EMPTY_SKELETON.into())
}

fn insert_path(root: &mut Map<String, Value>, key: &str) {
    let mut segments = key.split('.').filter(|s| !s.is_empty()).peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            // A nested object already claimed this name; keep it
            current
                .entry(segment.to_string())
                .or_insert_with(|| Value::String(String::new()));
            return;
        }

        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot.as_object_mut() {
            Some(next) => current = next,
            None => return,
        }
    }
}

/// Fill `template` with the JSON object in `data`.
///
/// Data is parsed before the template is compiled so the two failures
/// are told apart.
pub fn apply_preview(template: &str, data: &str) -> Result<String, PreviewError> {
    let data: Value = serde_json::from_str(data).map_err(PreviewError::InvalidData)?;

    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(TEMPLATE_NAME, template)
        .map_err(|e| PreviewError::BadTemplate(e.to_string()))?;

    handlebars
        .render(TEMPLATE_NAME, &data)
        .map_err(|e| PreviewError::BadTemplate(e.to_string()))
}

/// Preview session for one rendered document
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// The rendered HTML with placeholders intact
    pub template: String,

    /// Editable JSON data, seeded with the skeleton
    pub data: String,

    /// What is currently shown
    pub document: String,
}

impl Preview {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let keys = extract_placeholders(&template);
        debug!(placeholders = keys.len(), "Prepared preview data");
        let data = placeholder_skeleton(&keys);
        Self {
            document: template.clone(),
            template,
            data,
        }
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Render the template with the current data; the shown document only
    /// changes on success
    pub fn apply(&mut self) -> Result<&str, PreviewError> {
        self.document = apply_preview(&self.template, &self.data)?;
        Ok(&self.document)
    }
}
