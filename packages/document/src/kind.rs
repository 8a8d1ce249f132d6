//! Component kinds and their editing rules.

use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::TreeError;

/// Closed set of components the editor can place on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Text,
    Button,
    Image,
    Video,
    HtmlBox,
    CustomDivider,
    /// Multi-column container ("Columns")
    Container,
    /// Column slot inside a container
    Resizer,
    /// Email body, only ever the root
    BodyWrapper,
}

/// Drag-and-drop capabilities of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRules {
    pub can_drag: bool,
    pub can_drop: bool,
    pub can_move_in: bool,
    pub can_move_out: bool,
}

impl NodeRules {
    const OPEN: NodeRules = NodeRules {
        can_drag: true,
        can_drop: true,
        can_move_in: true,
        can_move_out: true,
    };

    const LOCKED: NodeRules = NodeRules {
        can_drag: false,
        can_drop: false,
        can_move_in: false,
        can_move_out: false,
    };
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Text,
        ComponentKind::Button,
        ComponentKind::Image,
        ComponentKind::Video,
        ComponentKind::HtmlBox,
        ComponentKind::CustomDivider,
        ComponentKind::Container,
        ComponentKind::Resizer,
        ComponentKind::BodyWrapper,
    ];

    /// Name used as `type.resolvedName` in serialized documents
    pub fn resolved_name(self) -> &'static str {
        match self {
            ComponentKind::Text => "Text",
            ComponentKind::Button => "Button",
            ComponentKind::Image => "Image",
            ComponentKind::Video => "Video",
            ComponentKind::HtmlBox => "HtmlBox",
            ComponentKind::CustomDivider => "CustomDivider",
            ComponentKind::Container => "Container",
            ComponentKind::Resizer => "Resizer",
            ComponentKind::BodyWrapper => "BodyWrapper",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ComponentKind::Container => "Columns",
            ComponentKind::CustomDivider => "Divider",
            ComponentKind::Resizer => "Block",
            ComponentKind::BodyWrapper => "Body",
            ComponentKind::HtmlBox => "Html",
            other => other.resolved_name(),
        }
    }

    /// Whether fresh nodes of this kind hold children
    pub fn is_canvas(self) -> bool {
        matches!(self, ComponentKind::Container | ComponentKind::Resizer)
    }

    pub fn rules(self) -> NodeRules {
        match self {
            ComponentKind::BodyWrapper => NodeRules::LOCKED,
            ComponentKind::Button => NodeRules {
                can_move_in: false,
                ..NodeRules::OPEN
            },
            _ => NodeRules::OPEN,
        }
    }

    /// Default props record for a freshly created node
    pub fn default_props(self) -> Value {
        match self {
            ComponentKind::Text => json!({
                "props": { "text": "<p>Enter your text here</p>" },
                "style": {},
                "parentStyle": padded(json!({ "backgroundColor": "#00000000" })),
                "options": { "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::Button => json!({
                "props": { "text": "Button", "path": "#", "linkTarget": "_blank" },
                "style": bordered(json!({
                    "color": "#ffffff",
                    "backgroundColor": "#424242",
                    "borderRadius": 8,
                    "paddingTop": 10,
                    "paddingBottom": 10,
                    "paddingLeft": 24,
                    "paddingRight": 24
                })),
                "parentStyle": padded(json!({ "align": "center" })),
                "options": { "borderOptions": "less", "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::Image => json!({
                "props": { "src": "", "altText": "Not found", "linkPath": "#", "linkTarget": "_blank" },
                "style": bordered(json!({ "width": "100%" })),
                "parentStyle": padded(json!({ "align": "center", "backgroundColor": "#00000000" })),
                "options": { "borderOptions": "less", "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::Video => json!({
                "props": { "src": "", "altText": "Not found", "linkPath": "#", "linkTarget": "_blank" },
                "style": bordered(json!({ "width": "100%" })),
                "parentStyle": padded(json!({
                    "align": "center",
                    "backgroundImage": "",
                    "backgroundColor": "#00000000"
                })),
                "options": { "borderOptions": "less", "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::HtmlBox => json!({
                "props": { "html": "<h4>Hello, world!</h4>" },
                "parentStyle": padded(json!({})),
                "options": { "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::CustomDivider => json!({
                "props": {},
                "style": { "borderTop": "1px solid #e0e0e0", "width": "100%" },
                "parentStyle": padded(json!({ "align": "center" })),
                "options": { "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::Container | ComponentKind::Resizer => json!({
                "props": { "xs": 12, "containerType": 1, "alignItems": "flex-start" },
                "style": bordered(json!({
                    "backgroundColor": "#00000000",
                    "backgroundImage": ""
                })),
                "parentStyle": padded(json!({})),
                "options": { "borderOptions": "less", "paddingOptions": "less", "marginOptions": "less" }
            }),
            ComponentKind::BodyWrapper => json!({
                "style": { "backgroundColor": "#f5f5f5", "backgroundImage": "" }
            }),
        }
    }
}

fn padded(mut base: Value) -> Value {
    if let Some(map) = base.as_object_mut() {
        for side in ["paddingTop", "paddingBottom", "paddingLeft", "paddingRight"] {
            map.entry(side).or_insert(json!(0));
        }
        for side in ["marginTop", "marginBottom", "marginLeft", "marginRight"] {
            map.entry(side).or_insert(json!(0));
        }
    }
    base
}

fn bordered(mut base: Value) -> Value {
    if let Some(map) = base.as_object_mut() {
        for side in ["borderTop", "borderBottom", "borderLeft", "borderRight"] {
            map.entry(side).or_insert(json!("0px solid #000000"));
        }
    }
    base
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resolved_name())
    }
}

impl FromStr for ComponentKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.resolved_name() == s)
            .ok_or_else(|| TreeError::UnknownComponent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_names_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.resolved_name().parse::<ComponentKind>(), Ok(kind));
        }
        assert!("Carousel".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_body_wrapper_is_locked() {
        let rules = ComponentKind::BodyWrapper.rules();
        assert!(!rules.can_drag);
        assert!(!rules.can_drop);
        assert!(!rules.can_move_in);
        assert!(!rules.can_move_out);
    }

    #[test]
    fn test_button_refuses_children() {
        assert!(!ComponentKind::Button.rules().can_move_in);
        assert!(ComponentKind::Button.rules().can_drag);
    }

    #[test]
    fn test_default_props_carry_spacing() {
        let props = ComponentKind::Image.default_props();
        assert_eq!(props["parentStyle"]["paddingTop"], 0);
        assert_eq!(props["style"]["borderLeft"], "0px solid #000000");
        assert_eq!(props["props"]["altText"], "Not found");
    }
}
