//! Recognizing imported editor state.
//!
//! Imported files come from several producers, so four shapes are
//! accepted:
//!
//! | shape                          | variant     |
//! |--------------------------------|-------------|
//! | `"<token>"`                    | `Encoded`   |
//! | `{json: {ROOT..}, version}`    | `Export`    |
//! | `{json: {..}}`                 | `Framework` |
//! | `{ROOT: {..}, ..}`             | `RawNodes`  |

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{decode_state, EditorState, StateError};

const INVALID_DATA: &str = "Invalid data format";
const UNRECOGNIZED: &str = "Unrecognized editor state format";

/// A recognized import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedState {
    /// An already-encoded document token
    Encoded(String),

    /// This editor's own `.json` export
    Export { json: Value, version: String },

    /// A framework state object without a version
    Framework { json: Value },

    /// A bare node map
    RawNodes(Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFormat {
    Export,
    #[serde(rename = "craftjs")]
    Framework,
    Raw,
}

/// Outcome of `validate_editor_state`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub valid: bool,
    pub is_encoded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<StateFormat>,
    pub is_raw_nodes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl ImportedState {
    /// Classify parsed JSON; the error message says why it was rejected
    pub fn classify(data: Value) -> Result<Self, StateError> {
        let mut object = match data {
            Value::String(token) => return Ok(ImportedState::Encoded(token)),
            Value::Object(object) => object,
            _ => return Err(StateError::Invalid(INVALID_DATA.to_string())),
        };

        let json = object.get("json").filter(|json| truthy(json));
        let version = object.get("version").filter(|version| truthy(version));

        if let (Some(json), Some(version)) = (json, version) {
            if json.get("ROOT").map(truthy).unwrap_or(false) {
                let version = match version {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Ok(ImportedState::Export {
                    json: json.clone(),
                    version,
                });
            }
        }

        if matches!(json, Some(Value::Object(_))) {
            let json = object.remove("json").unwrap_or_default();
            return Ok(ImportedState::Framework { json });
        }

        if matches!(object.get("ROOT"), Some(Value::Object(_))) {
            return Ok(ImportedState::RawNodes(object));
        }

        Err(StateError::Invalid(UNRECOGNIZED.to_string()))
    }

    pub fn format(&self) -> Option<StateFormat> {
        match self {
            ImportedState::Encoded(_) => None,
            ImportedState::Export { .. } => Some(StateFormat::Export),
            ImportedState::Framework { .. } => Some(StateFormat::Framework),
            ImportedState::RawNodes(_) => Some(StateFormat::Raw),
        }
    }

    /// Normalize to `{json, version}`; shapes without a version get
    /// `current_version`
    pub fn into_editor_state(self, current_version: &str) -> Result<EditorState, StateError> {
        match self {
            ImportedState::Encoded(token) => decode_state(&token).ok_or(StateError::Decode),
            ImportedState::Export { json, version } => {
                Ok(EditorState::new(serde_json::to_string(&json)?, version))
            }
            ImportedState::Framework { json } => Ok(EditorState::new(
                serde_json::to_string(&json)?,
                current_version,
            )),
            ImportedState::RawNodes(nodes) => Ok(EditorState::new(
                serde_json::to_string(&nodes)?,
                current_version,
            )),
        }
    }
}

/// Report which shape `data` has, without consuming it
pub fn validate_editor_state(data: &Value) -> Validation {
    match ImportedState::classify(data.clone()) {
        Ok(state) => Validation {
            valid: true,
            is_encoded: matches!(state, ImportedState::Encoded(_)),
            format: state.format(),
            is_raw_nodes: matches!(state, ImportedState::RawNodes(_)),
            message: None,
        },
        Err(e) => Validation {
            valid: false,
            message: Some(e.to_string()),
            ..Validation::default()
        },
    }
}
