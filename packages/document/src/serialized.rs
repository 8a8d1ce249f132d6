//! Wire form of a node, as stored in the document `json` string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{ComponentKind, Node, NodeId, TreeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedType {
    pub resolved_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub node_type: ResolvedType,

    #[serde(default)]
    pub is_canvas: bool,

    #[serde(default = "empty_object")]
    pub props: Value,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default = "empty_object")]
    pub custom: Value,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub parent: Option<NodeId>,

    #[serde(default)]
    pub nodes: Vec<NodeId>,

    #[serde(default)]
    pub linked_nodes: BTreeMap<String, NodeId>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Node {
    pub fn from_serialized(id: impl Into<NodeId>, node: SerializedNode) -> TreeResult<Self> {
        let kind: ComponentKind = node.node_type.resolved_name.parse()?;

        Ok(Self {
            id: id.into(),
            kind,
            is_canvas: node.is_canvas,
            props: node.props,
            display_name: node
                .display_name
                .unwrap_or_else(|| kind.display_name().to_string()),
            custom: node.custom,
            hidden: node.hidden,
            parent: node.parent,
            nodes: node.nodes,
            linked_nodes: node.linked_nodes,
        })
    }

    pub fn to_serialized(&self) -> SerializedNode {
        SerializedNode {
            node_type: ResolvedType {
                resolved_name: self.kind.resolved_name().to_string(),
            },
            is_canvas: self.is_canvas,
            props: self.props.clone(),
            display_name: Some(self.display_name.clone()),
            custom: self.custom.clone(),
            hidden: self.hidden,
            parent: self.parent.clone(),
            nodes: self.nodes.clone(),
            linked_nodes: self.linked_nodes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_framework_node() {
        let raw = json!({
            "type": { "resolvedName": "Text" },
            "isCanvas": false,
            "props": { "props": { "text": "Hi" } },
            "displayName": "Text",
            "custom": {},
            "hidden": false,
            "parent": "main",
            "nodes": [],
            "linkedNodes": {}
        });

        let serialized: SerializedNode = serde_json::from_value(raw).unwrap();
        let node = Node::from_serialized("t1", serialized).unwrap();

        assert_eq!(node.kind, ComponentKind::Text);
        assert_eq!(node.parent.as_deref(), Some("main"));
        assert_eq!(node.prop("props.text"), Some(&json!("Hi")));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let raw = json!({ "type": { "resolvedName": "Resizer" } });
        let serialized: SerializedNode = serde_json::from_value(raw).unwrap();
        let node = Node::from_serialized("col", serialized).unwrap();

        assert_eq!(node.display_name, "Block");
        assert!(node.nodes.is_empty());
        assert!(node.custom.is_object());
    }

    #[test]
    fn test_unknown_component_is_rejected() {
        let raw = json!({ "type": { "resolvedName": "Marquee" } });
        let serialized: SerializedNode = serde_json::from_value(raw).unwrap();
        assert!(Node::from_serialized("m", serialized).is_err());
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let node = Node::new("c1", ComponentKind::Container);
        let value = serde_json::to_value(node.to_serialized()).unwrap();

        assert_eq!(value["type"]["resolvedName"], "Container");
        assert_eq!(value["isCanvas"], true);
        assert!(value.get("linkedNodes").is_some());
        assert!(value.get("displayName").is_some());
    }
}
