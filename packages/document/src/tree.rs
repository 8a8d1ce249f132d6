//! # Node Arena
//!
//! Owns every node of a document and keeps the structural invariants:
//!
//! - `ROOT` exists and has no parent
//! - every child or linked reference points at an existing node whose
//!   `parent` is the referencing node
//! - every node is referenced exactly once and is reachable from `ROOT`
//!
//! Structural edits (`insert_subtree`, `remove_subtree`, `move_node`) keep
//! these invariants; `check_integrity` verifies them for trees that came
//! from outside.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::{ComponentKind, IdGenerator, Node, NodeId, SerializedNode, TreeError, TreeResult};

pub const ROOT_NODE: &str = "ROOT";

/// Id of the top-level container in a fresh document
pub const MAIN_NODE: &str = "main";

/// A detached group of nodes rooted at `root_id`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSubtree {
    pub root_id: NodeId,
    pub nodes: BTreeMap<NodeId, Node>,
}

impl NodeSubtree {
    pub fn single(node: Node) -> Self {
        let root_id = node.id.clone();
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), node);
        Self { root_id, nodes }
    }

    /// Freshly constructed node of `kind`, ids unused in `tree`.
    ///
    /// Containers with more than one column get their column slots.
    pub fn fresh(
        kind: ComponentKind,
        is_canvas: bool,
        tree: &NodeTree,
        ids: &mut IdGenerator,
    ) -> Self {
        let id = next_free_id(ids, tree, &BTreeMap::new());
        let node = Node::new(id, kind).with_canvas(is_canvas);
        let columns = if kind == ComponentKind::Container {
            node.container_type()
        } else {
            1
        };

        let mut subtree = Self::single(node);
        if columns > 1 {
            subtree.attach_columns(columns, tree, ids);
        }
        subtree
    }

    /// Multi-column container with `count` empty columns
    pub fn columns(count: usize, tree: &NodeTree, ids: &mut IdGenerator) -> Self {
        let id = next_free_id(ids, tree, &BTreeMap::new());
        let mut node = Node::new(id, ComponentKind::Container);
        node.set_prop("props.containerType", json!(count.max(1)));

        let mut subtree = Self::single(node);
        if count > 1 {
            subtree.attach_columns(count, tree, ids);
        }
        subtree
    }

    fn attach_columns(&mut self, count: usize, tree: &NodeTree, ids: &mut IdGenerator) {
        let width = 12 / count.max(1);
        for index in 0..count {
            let column_id = next_free_id(ids, tree, &self.nodes);
            let mut column = Node::new(column_id.clone(), ComponentKind::Resizer)
                .with_custom_name(format!("Column {}", index + 1));
            column.set_prop("props.xs", json!(width));
            column.parent = Some(self.root_id.clone());

            if let Some(root) = self.nodes.get_mut(&self.root_id) {
                root.linked_nodes.insert(format!("column{}", index), column_id.clone());
            }
            self.nodes.insert(column_id, column);
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubtree {
    root_node_id: NodeId,
    nodes: BTreeMap<NodeId, SerializedNode>,
}

impl Serialize for NodeSubtree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawSubtree {
            root_node_id: self.root_id.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.to_serialized()))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeSubtree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSubtree::deserialize(deserializer)?;
        let nodes = raw
            .nodes
            .into_iter()
            .map(|(id, node)| -> TreeResult<(NodeId, Node)> {
                Ok((id.clone(), Node::from_serialized(id, node)?))
            })
            .collect::<TreeResult<BTreeMap<_, _>>>()
            .map_err(D::Error::custom)?;

        if !nodes.contains_key(&raw.root_node_id) {
            return Err(D::Error::custom(TreeError::NodeNotFound(raw.root_node_id)));
        }
        Ok(Self {
            root_id: raw.root_node_id,
            nodes,
        })
    }
}

fn next_free_id(
    ids: &mut IdGenerator,
    tree: &NodeTree,
    taken: &BTreeMap<NodeId, Node>,
) -> NodeId {
    loop {
        let id = ids.fresh_id(tree);
        if !taken.contains_key(&id) {
            return id;
        }
    }
}

/// Owned arena of document nodes keyed by id
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTree {
    nodes: BTreeMap<NodeId, Node>,
}

impl NodeTree {
    /// The default frame: a body holding the Main container
    pub fn empty_document() -> Self {
        let mut root = Node::new(ROOT_NODE, ComponentKind::BodyWrapper);
        root.nodes.push(MAIN_NODE.to_string());

        let mut main = Node::new(MAIN_NODE, ComponentKind::Container).with_custom_name("Main");
        main.parent = Some(ROOT_NODE.to_string());
        main.set_prop("props.xs", json!(7));
        main.set_prop("props.id", json!("Main"));
        main.set_prop("props.containerType", json!(1));
        main.set_prop("style.backgroundColor", json!("#ffffff"));
        for side in ["paddingTop", "paddingBottom", "paddingLeft", "paddingRight"] {
            main.set_prop(&format!("parentStyle.{}", side), json!(10));
        }

        let mut nodes = BTreeMap::new();
        nodes.insert(root.id.clone(), root);
        nodes.insert(main.id.clone(), main);
        Self { nodes }
    }

    /// Build a tree from nodes, verifying the invariants
    pub fn from_nodes(nodes: BTreeMap<NodeId, Node>) -> TreeResult<Self> {
        let tree = Self { nodes };
        tree.check_integrity()?;
        Ok(tree)
    }

    pub fn from_serialized(raw: BTreeMap<NodeId, SerializedNode>) -> TreeResult<Self> {
        let nodes = raw
            .into_iter()
            .map(|(id, node)| -> TreeResult<(NodeId, Node)> {
                Ok((id.clone(), Node::from_serialized(id, node)?))
            })
            .collect::<TreeResult<BTreeMap<_, _>>>()?;
        Self::from_nodes(nodes)
    }

    /// Parse the document `json` string
    pub fn from_json(json: &str) -> TreeResult<Self> {
        let tree: NodeTree = serde_json::from_str(json)?;
        debug!(nodes = tree.len(), "Parsed document tree");
        Ok(tree)
    }

    pub fn from_value(value: Value) -> TreeResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to the document `json` string
    pub fn to_json(&self) -> TreeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> TreeResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(ROOT_NODE)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: &str) -> TreeResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    pub fn node_mut(&mut self, id: &str) -> TreeResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn count_kind(&self, kind: ComponentKind) -> usize {
        self.iter().filter(|node| node.kind == kind).count()
    }

    pub fn children(&self, id: &str) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.nodes)
    }

    /// Parent id and index among the parent's ordered children.
    ///
    /// `None` for the root and for linked slots.
    pub fn position(&self, id: &str) -> TreeResult<Option<(NodeId, usize)>> {
        let node = self.node(id)?;
        let Some(parent_id) = &node.parent else {
            return Ok(None);
        };

        let parent = self.node(parent_id)?;
        Ok(parent
            .nodes
            .iter()
            .position(|child| child == id)
            .map(|index| (parent_id.clone(), index)))
    }

    /// All nodes below `id`, depth first, linked slots included
    pub fn descendants(&self, id: &str) -> TreeResult<Vec<NodeId>> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out)?;
        Ok(out)
    }

    fn collect_descendants(&self, id: &str, out: &mut Vec<NodeId>) -> TreeResult<()> {
        let node = self.node(id)?;
        for child in node.child_refs() {
            if !self.contains(child) {
                return Err(TreeError::dangling_child(id, child.as_str()));
            }
            out.push(child.clone());
            self.collect_descendants(child, out)?;
        }
        Ok(())
    }

    /// Whether `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut current = Some(id.to_string());
        let mut seen = HashSet::new();

        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            if !seen.insert(node_id.clone()) {
                return false;
            }
            current = self.get(&node_id).and_then(|node| node.parent.clone());
        }
        false
    }

    /// Copy of the subtree rooted at `id`
    pub fn subtree(&self, id: &str) -> TreeResult<NodeSubtree> {
        let mut nodes = BTreeMap::new();
        nodes.insert(id.to_string(), self.node(id)?.clone());
        for descendant in self.descendants(id)? {
            let node = self.node(&descendant)?.clone();
            nodes.insert(descendant, node);
        }

        Ok(NodeSubtree {
            root_id: id.to_string(),
            nodes,
        })
    }

    /// Attach a detached subtree as a child of `parent_id` at `index`
    /// (clamped to the end).
    pub fn insert_subtree(
        &mut self,
        mut subtree: NodeSubtree,
        parent_id: &str,
        index: usize,
    ) -> TreeResult<()> {
        self.node(parent_id)?;
        if !subtree.nodes.contains_key(&subtree.root_id) {
            return Err(TreeError::NodeNotFound(subtree.root_id));
        }
        if let Some(taken) = subtree.nodes.keys().find(|id| self.contains(id)) {
            return Err(TreeError::DuplicateId(taken.clone()));
        }

        if let Some(root) = subtree.nodes.get_mut(&subtree.root_id) {
            root.parent = Some(parent_id.to_string());
        }

        let root_id = subtree.root_id.clone();
        self.nodes.append(&mut subtree.nodes);

        let parent = self.node_mut(parent_id)?;
        let index = index.min(parent.nodes.len());
        parent.nodes.insert(index, root_id);
        Ok(())
    }

    /// Detach and return the subtree rooted at `id`, with the parent and
    /// index it was removed from.
    pub fn remove_subtree(&mut self, id: &str) -> TreeResult<(NodeSubtree, NodeId, usize)> {
        if id == ROOT_NODE {
            return Err(TreeError::RootDetached);
        }
        let (parent_id, index) = self
            .position(id)?
            .ok_or_else(|| TreeError::LinkedSlot(id.to_string()))?;

        let subtree = self.subtree(id)?;
        for node_id in subtree.nodes.keys() {
            self.nodes.remove(node_id);
        }
        self.node_mut(&parent_id)?.nodes.remove(index);

        Ok((subtree, parent_id, index))
    }

    /// Move `id` under `new_parent_id` so it ends up at `index` (clamped)
    pub fn move_node(&mut self, id: &str, new_parent_id: &str, index: usize) -> TreeResult<()> {
        if id == ROOT_NODE {
            return Err(TreeError::RootDetached);
        }
        self.node(new_parent_id)?;
        let (old_parent, old_index) = self
            .position(id)?
            .ok_or_else(|| TreeError::LinkedSlot(id.to_string()))?;

        self.node_mut(&old_parent)?.nodes.remove(old_index);

        let parent = self.node_mut(new_parent_id)?;
        let index = index.min(parent.nodes.len());
        parent.nodes.insert(index, id.to_string());

        self.node_mut(id)?.parent = Some(new_parent_id.to_string());
        Ok(())
    }

    /// Verify the structural invariants
    pub fn check_integrity(&self) -> TreeResult<()> {
        let root = self.root().ok_or(TreeError::MissingRoot)?;
        if let Some(parent) = &root.parent {
            return Err(TreeError::ParentMismatch {
                node: ROOT_NODE.to_string(),
                listed: parent.clone(),
                actual: root.parent.clone(),
            });
        }

        let mut referenced = HashSet::new();
        for node in self.nodes.values() {
            for child_id in node.child_refs() {
                let child = self
                    .get(child_id)
                    .ok_or_else(|| TreeError::dangling_child(node.id.as_str(), child_id.as_str()))?;

                if child.parent.as_deref() != Some(node.id.as_str()) {
                    return Err(TreeError::ParentMismatch {
                        node: child_id.clone(),
                        listed: node.id.clone(),
                        actual: child.parent.clone(),
                    });
                }
                if !referenced.insert(child_id.as_str()) {
                    return Err(TreeError::DuplicateReference(child_id.clone()));
                }
            }
        }

        for node in self.nodes.values() {
            if node.id == ROOT_NODE {
                continue;
            }
            match &node.parent {
                Some(parent) if !self.contains(parent) => {
                    return Err(TreeError::DanglingParent {
                        node: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
                _ if !referenced.contains(node.id.as_str()) => {
                    return Err(TreeError::Unreachable(node.id.clone()));
                }
                _ => {}
            }
        }

        // Every node is referenced once; a cycle would leave part of the
        // arena disconnected from the root.
        let reachable = self.descendants(ROOT_NODE)?.len() + 1;
        if reachable != self.nodes.len() {
            let connected: HashSet<NodeId> = self.descendants(ROOT_NODE)?.into_iter().collect();
            let orphan = self
                .nodes
                .keys()
                .find(|id| id.as_str() != ROOT_NODE && !connected.contains(*id))
                .cloned()
                .unwrap_or_default();
            return Err(TreeError::Unreachable(orphan));
        }

        Ok(())
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::empty_document()
    }
}

impl Serialize for NodeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (id, node) in &self.nodes {
            map.serialize_entry(id, &node.to_serialized())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NodeTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<NodeId, SerializedNode>::deserialize(deserializer)?;
        NodeTree::from_serialized(raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_texts(count: usize) -> (NodeTree, Vec<NodeId>) {
        let mut tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("t");
        let mut created = Vec::new();
        for i in 0..count {
            let subtree = NodeSubtree::fresh(ComponentKind::Text, false, &tree, &mut ids);
            created.push(subtree.root_id.clone());
            tree.insert_subtree(subtree, MAIN_NODE, i).unwrap();
        }
        (tree, created)
    }

    #[test]
    fn test_empty_document_is_valid() {
        let tree = NodeTree::empty_document();
        assert!(tree.check_integrity().is_ok());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(ROOT_NODE).unwrap(), &[MAIN_NODE.to_string()]);
        assert!(tree.get(MAIN_NODE).unwrap().is_main());
    }

    #[test]
    fn test_json_round_trip() {
        let (tree, _) = tree_with_texts(2);
        let json = tree.to_json().unwrap();
        let parsed = NodeTree::from_json(&json).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_insert_and_position() {
        let (tree, ids) = tree_with_texts(3);
        assert_eq!(
            tree.position(&ids[2]).unwrap(),
            Some((MAIN_NODE.to_string(), 2))
        );
        assert_eq!(tree.position(ROOT_NODE).unwrap(), None);
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let (mut tree, ids) = tree_with_texts(1);
        let copy = tree.subtree(&ids[0]).unwrap();
        let result = tree.insert_subtree(copy, MAIN_NODE, 0);
        assert_eq!(result, Err(TreeError::DuplicateId(ids[0].clone())));
    }

    #[test]
    fn test_remove_subtree_takes_descendants() {
        let mut tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("n");
        let columns = NodeSubtree::columns(2, &tree, &mut ids);
        let container_id = columns.root_id.clone();
        tree.insert_subtree(columns, MAIN_NODE, 0).unwrap();
        assert_eq!(tree.len(), 5);

        let (removed, parent, index) = tree.remove_subtree(&container_id).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(parent, MAIN_NODE);
        assert_eq!(index, 0);
        assert_eq!(tree.len(), 2);
        assert!(tree.check_integrity().is_ok());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = NodeTree::empty_document();
        assert_eq!(tree.remove_subtree(ROOT_NODE), Err(TreeError::RootDetached));
    }

    #[test]
    fn test_linked_slot_cannot_be_removed() {
        let mut tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("n");
        let columns = NodeSubtree::columns(2, &tree, &mut ids);
        let column_id = columns.root().unwrap().linked_nodes["column0"].clone();
        tree.insert_subtree(columns, MAIN_NODE, 0).unwrap();

        assert_eq!(
            tree.remove_subtree(&column_id),
            Err(TreeError::LinkedSlot(column_id.clone()))
        );
    }

    #[test]
    fn test_move_node_reorders() {
        let (mut tree, ids) = tree_with_texts(3);
        tree.move_node(&ids[0], MAIN_NODE, 2).unwrap();
        assert_eq!(
            tree.children(MAIN_NODE).unwrap(),
            &[ids[1].clone(), ids[2].clone(), ids[0].clone()]
        );
        assert!(tree.check_integrity().is_ok());
    }

    #[test]
    fn test_integrity_detects_dangling_child() {
        let mut tree = NodeTree::empty_document();
        tree.get_mut(MAIN_NODE).unwrap().nodes.push("ghost".to_string());
        assert_eq!(
            tree.check_integrity(),
            Err(TreeError::dangling_child(MAIN_NODE, "ghost"))
        );
    }

    #[test]
    fn test_integrity_detects_orphan() {
        let mut tree = NodeTree::empty_document();
        let mut orphan = Node::new("orphan", ComponentKind::Text);
        orphan.parent = Some(MAIN_NODE.to_string());
        tree.nodes.insert(orphan.id.clone(), orphan);
        assert_eq!(
            tree.check_integrity(),
            Err(TreeError::Unreachable("orphan".to_string()))
        );
    }

    #[test]
    fn test_fresh_columns_have_linked_slots() {
        let tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("c");
        let columns = NodeSubtree::columns(3, &tree, &mut ids);

        let root = columns.root().unwrap();
        assert_eq!(root.linked_nodes.len(), 3);
        for column_id in root.linked_nodes.values() {
            let column = &columns.nodes[column_id];
            assert_eq!(column.kind, ComponentKind::Resizer);
            assert_eq!(column.parent.as_deref(), Some(root.id.as_str()));
            assert_eq!(column.prop("props.xs"), Some(&json!(4)));
            assert!(column.label().starts_with("Column"));
        }
    }

    #[test]
    fn test_subtree_serializes_with_root_id() {
        let tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("s");
        let columns = NodeSubtree::columns(2, &tree, &mut ids);

        let value = serde_json::to_value(&columns).unwrap();
        assert_eq!(value["rootNodeId"], "s-1");
        assert_eq!(value["nodes"].as_object().unwrap().len(), 3);

        let back: NodeSubtree = serde_json::from_value(value).unwrap();
        assert_eq!(back, columns);
    }

    #[test]
    fn test_is_ancestor() {
        let (tree, ids) = tree_with_texts(1);
        assert!(tree.is_ancestor(ROOT_NODE, &ids[0]));
        assert!(tree.is_ancestor(MAIN_NODE, &ids[0]));
        assert!(!tree.is_ancestor(&ids[0], MAIN_NODE));
    }
}
