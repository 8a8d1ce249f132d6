//! Message envelopes exchanged with the parent page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Messages the parent sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Load an encoded state token; anything that is not a string loads
    /// the empty document
    LoadEditor(Option<String>),
    FetchState,
}

impl Inbound {
    /// `None` for envelopes this editor does not understand
    pub fn parse(data: &Value) -> Option<Self> {
        let message = data.get("message")?.as_str()?;
        match message {
            "loadEditor" => Some(Inbound::LoadEditor(
                data.get("value").and_then(Value::as_str).map(str::to_string),
            )),
            "fetchState" => Some(Inbound::FetchState),
            other => {
                debug!(message = other, "Ignoring unknown message");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// Rendered HTML, `null` when the render service failed
    pub html: Option<String>,

    /// Encoded `{json, version}` token
    pub state: String,
}

/// Replies to the parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", content = "value", rename_all = "camelCase")]
pub enum Outbound {
    EditorLoaded(bool),
    SavedState(SavedState),
}

impl Outbound {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// The parent URL must contain the sender's origin
pub fn origin_allowed(parent_url: &str, origin: &str) -> bool {
    !origin.is_empty() && parent_url.contains(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_inbound() {
        assert_eq!(
            Inbound::parse(&json!({"message": "loadEditor", "value": "abc"})),
            Some(Inbound::LoadEditor(Some("abc".into())))
        );
        assert_eq!(
            Inbound::parse(&json!({"message": "loadEditor", "value": null})),
            Some(Inbound::LoadEditor(None))
        );
        assert_eq!(
            Inbound::parse(&json!({"message": "fetchState"})),
            Some(Inbound::FetchState)
        );
        assert_eq!(Inbound::parse(&json!({"message": "resize", "value": 3})), None);
        assert_eq!(Inbound::parse(&json!("fetchState")), None);
    }

    #[test]
    fn test_outbound_shape() {
        assert_eq!(
            Outbound::EditorLoaded(true).to_value().unwrap(),
            json!({"message": "editorLoaded", "value": true})
        );
        let saved = Outbound::SavedState(SavedState {
            html: None,
            state: "tok".into(),
        });
        assert_eq!(
            saved.to_value().unwrap(),
            json!({"message": "savedState", "value": {"html": null, "state": "tok"}})
        );
    }

    #[test]
    fn test_origin_check() {
        let parent = "https://app.example.com/campaigns/42";
        assert!(origin_allowed(parent, "https://app.example.com"));
        assert!(!origin_allowed(parent, "https://evil.example.net"));
        assert!(!origin_allowed(parent, ""));
    }
}
