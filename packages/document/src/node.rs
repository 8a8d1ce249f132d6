use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{ComponentKind, NodeRules};

pub type NodeId = String;

/// A component instance in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: ComponentKind,

    /// Whether the node holds children
    pub is_canvas: bool,

    /// Component configuration: `props`, `style`, `parentStyle`, `options`
    pub props: Value,

    pub display_name: String,

    /// Free-form editor metadata (`displayName` override, ...)
    pub custom: Value,

    pub hidden: bool,

    /// `None` only for the root
    pub parent: Option<NodeId>,

    /// Ordered children
    pub nodes: Vec<NodeId>,

    /// Named child slots, e.g. `column0`
    pub linked_nodes: BTreeMap<String, NodeId>,
}

impl Node {
    /// Fresh node with the kind's default props
    pub fn new(id: impl Into<NodeId>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            is_canvas: kind.is_canvas(),
            props: kind.default_props(),
            display_name: kind.display_name().to_string(),
            custom: Value::Object(Map::new()),
            hidden: false,
            parent: None,
            nodes: Vec::new(),
            linked_nodes: BTreeMap::new(),
        }
    }

    pub fn with_canvas(mut self, is_canvas: bool) -> Self {
        self.is_canvas = is_canvas;
        self
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        if !self.custom.is_object() {
            self.custom = Value::Object(Map::new());
        }
        if let Some(custom) = self.custom.as_object_mut() {
            custom.insert("displayName".to_string(), Value::String(name.into()));
        }
        self
    }

    pub fn rules(&self) -> NodeRules {
        self.kind.rules()
    }

    /// `custom.displayName` if set, otherwise the kind's display name
    pub fn label(&self) -> &str {
        self.custom
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or(&self.display_name)
    }

    /// The top-level container of the default frame
    pub fn is_main(&self) -> bool {
        self.custom.get("displayName").and_then(Value::as_str) == Some("Main")
    }

    /// Number of columns of a container (1 when unset)
    pub fn container_type(&self) -> usize {
        self.prop("props.containerType")
            .and_then(Value::as_u64)
            .map(|n| n.max(1) as usize)
            .unwrap_or(1)
    }

    /// Whether `incoming` may be dropped into this node.
    ///
    /// A column set only goes into the Main container or into a column;
    /// any other container refuses it.
    pub fn can_accept(&self, incoming: &Node) -> bool {
        if !self.is_canvas || !self.rules().can_move_in {
            return false;
        }

        let nests_columns = incoming.kind == ComponentKind::Container
            && self.kind == ComponentKind::Container
            && !self.is_main();

        !nests_columns
    }

    /// Ordered children followed by linked slots
    pub fn child_refs(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().chain(self.linked_nodes.values())
    }

    pub fn is_linked_child(&self, id: &str) -> bool {
        self.linked_nodes.values().any(|linked| linked == id)
    }

    /// Read a dotted path inside the props record (`style.backgroundColor`)
    pub fn prop(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.props, |value, key| value.get(key))
    }

    /// Write a dotted path, creating intermediate objects. Returns the
    /// previous value.
    pub fn set_prop(&mut self, path: &str, value: Value) -> Option<Value> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop()?;

        let mut current = &mut self.props;
        for segment in segments {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            current = current
                .as_object_mut()?
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current.as_object_mut()?.insert(last.to_string(), value)
    }

    /// Remove a dotted path. Returns the removed value.
    pub fn remove_prop(&mut self, path: &str) -> Option<Value> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop()?;

        let mut current = &mut self.props;
        for segment in segments {
            current = current.get_mut(segment)?;
        }
        current.as_object_mut()?.remove(last)
    }
}
