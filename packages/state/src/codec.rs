//! Opaque state tokens.
//!
//! A token is the URL-safe, unpadded base64 of the UTF-8 JSON text, so it
//! survives query strings and postMessage payloads untouched.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

use crate::{EditorState, StateError};

pub fn encode(json: &str) -> String {
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// `None` for anything that is not a token produced by `encode`
pub fn decode(token: &str) -> Option<String> {
    let bytes = match URL_SAFE_NO_PAD.decode(token.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "State token is not base64");
            return None;
        }
    };
    String::from_utf8(bytes).ok()
}

/// Decode a token and parse it as `{json, version}`
pub fn decode_state(token: &str) -> Option<EditorState> {
    let json = decode(token)?;
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            debug!(error = %e, "Decoded state is not an editor state");
            None
        }
    }
}

pub fn encode_state(state: &EditorState) -> Result<String, StateError> {
    Ok(encode(&serde_json::to_string(state)?))
}
