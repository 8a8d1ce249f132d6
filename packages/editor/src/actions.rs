//! # Node Actions
//!
//! The toolbar operations on the current node, each turned into a single
//! `Mutation`. They read the tree but never change it; the caller applies
//! the result (usually through `EditSession`, so it lands on the undo
//! stack).
//!
//! `move_up`/`move_down` return `None` at the boundaries.

use std::collections::BTreeMap;

use crate::{EditorError, Mutation};
use mailcraft_document::{
    ComponentKind, IdGenerator, Node, NodeId, NodeSubtree, NodeTree, TreeError,
};

/// Move `current` one slot towards the front of its parent
pub fn move_up(tree: &NodeTree, current: &str) -> Result<Option<Mutation>, EditorError> {
    let Some((parent_id, index)) = tree.position(current)? else {
        return Ok(None);
    };
    if index == 0 {
        return Ok(None);
    }

    Ok(Some(Mutation::MoveNode {
        node_id: current.to_string(),
        new_parent_id: parent_id,
        index: index - 1,
    }))
}

/// Move `current` one slot towards the back of its parent
pub fn move_down(tree: &NodeTree, current: &str) -> Result<Option<Mutation>, EditorError> {
    let Some((parent_id, index)) = tree.position(current)? else {
        return Ok(None);
    };
    if index + 1 >= tree.children(&parent_id)?.len() {
        return Ok(None);
    }

    Ok(Some(Mutation::MoveNode {
        node_id: current.to_string(),
        new_parent_id: parent_id,
        index: index + 1,
    }))
}

/// Insert a fresh `kind` node into `target_parent`, right before or right
/// after `current`.
///
/// When `current` is not one of the target's children the node is appended.
pub fn add_node(
    tree: &NodeTree,
    ids: &mut IdGenerator,
    current: &str,
    kind: ComponentKind,
    target_parent: &str,
    insert_after: bool,
    is_canvas: bool,
) -> Result<Mutation, EditorError> {
    let siblings = tree.children(target_parent)?;
    let index = match siblings.iter().position(|id| id == current) {
        Some(index) if insert_after => index + 1,
        Some(index) => index,
        None => siblings.len(),
    };

    let subtree = NodeSubtree::fresh(kind, is_canvas, tree, ids);
    Ok(Mutation::add_node(subtree, target_parent, index))
}

/// Deep copy of the subtree at `id` with every node renamed to a fresh id.
///
/// Child lists, linked slots and parent links point at the new ids. The
/// copy's root keeps the original parent so it can be inserted as a
/// sibling. A child id missing from the tree is an error.
pub fn clone_subtree(
    tree: &NodeTree,
    id: &str,
    ids: &mut IdGenerator,
) -> Result<NodeSubtree, EditorError> {
    let mut nodes = BTreeMap::new();
    let root_id = copy_node(tree, id, ids, &mut nodes)?;

    if let (Some(root), Some(original)) = (nodes.get_mut(&root_id), tree.get(id)) {
        root.parent = original.parent.clone();
    }

    Ok(NodeSubtree { root_id, nodes })
}

fn copy_node(
    tree: &NodeTree,
    id: &str,
    ids: &mut IdGenerator,
    out: &mut BTreeMap<NodeId, Node>,
) -> Result<NodeId, TreeError> {
    let source = tree.node(id)?;
    let fresh_id = loop {
        let candidate = ids.fresh_id(tree);
        if !out.contains_key(&candidate) {
            break candidate;
        }
    };

    let mut copy = source.clone();
    copy.id = fresh_id.clone();
    copy.nodes = Vec::with_capacity(source.nodes.len());
    copy.linked_nodes = BTreeMap::new();
    // Reserve the id before recursing so children cannot take it
    out.insert(fresh_id.clone(), copy.clone());

    for child in &source.nodes {
        if !tree.contains(child) {
            return Err(TreeError::dangling_child(id, child.as_str()));
        }
        let child_copy = copy_node(tree, child, ids, out)?;
        copy.nodes.push(child_copy);
    }

    for (slot, child) in &source.linked_nodes {
        if !tree.contains(child) {
            return Err(TreeError::dangling_child(id, child.as_str()));
        }
        let child_copy = copy_node(tree, child, ids, out)?;
        copy.linked_nodes.insert(slot.clone(), child_copy);
    }

    for child in copy.child_refs() {
        if let Some(node) = out.get_mut(child) {
            node.parent = Some(fresh_id.clone());
        }
    }
    out.insert(fresh_id.clone(), copy);

    Ok(fresh_id)
}

/// Clone `current` and place the copy right after it
pub fn duplicate_node(
    tree: &NodeTree,
    ids: &mut IdGenerator,
    current: &str,
) -> Result<Mutation, EditorError> {
    let (parent_id, index) = tree
        .position(current)?
        .ok_or_else(|| TreeError::LinkedSlot(current.to_string()))?;

    let copy = clone_subtree(tree, current, ids)?;
    Ok(Mutation::add_node(copy, parent_id, index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::{MAIN_NODE, ROOT_NODE};

    fn tree_with(kinds: &[ComponentKind]) -> (NodeTree, Vec<NodeId>, IdGenerator) {
        let mut tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("a");
        let mut created = Vec::new();
        for (i, kind) in kinds.iter().enumerate() {
            let subtree = NodeSubtree::fresh(*kind, kind.is_canvas(), &tree, &mut ids);
            created.push(subtree.root_id.clone());
            tree.insert_subtree(subtree, MAIN_NODE, i).unwrap();
        }
        (tree, created, ids)
    }

    #[test]
    fn test_move_up_at_front_is_noop() {
        let (tree, ids, _) = tree_with(&[ComponentKind::Text, ComponentKind::Button]);
        assert_eq!(move_up(&tree, &ids[0]).unwrap(), None);
        assert_eq!(move_down(&tree, &ids[1]).unwrap(), None);
    }

    #[test]
    fn test_move_down_swaps_neighbours() {
        let (mut tree, ids, _) = tree_with(&[
            ComponentKind::Text,
            ComponentKind::Button,
            ComponentKind::Image,
        ]);
        let mutation = move_down(&tree, &ids[0]).unwrap().unwrap();
        mutation.apply(&mut tree).unwrap();
        assert_eq!(
            tree.children(MAIN_NODE).unwrap(),
            &[ids[1].clone(), ids[0].clone(), ids[2].clone()]
        );

        let mutation = move_up(&tree, &ids[2]).unwrap().unwrap();
        mutation.apply(&mut tree).unwrap();
        assert_eq!(
            tree.children(MAIN_NODE).unwrap(),
            &[ids[1].clone(), ids[2].clone(), ids[0].clone()]
        );
    }

    #[test]
    fn test_root_has_no_position() {
        let tree = NodeTree::empty_document();
        assert_eq!(move_up(&tree, ROOT_NODE).unwrap(), None);
    }

    #[test]
    fn test_add_node_before_and_after() {
        let (mut tree, ids, mut id_gen) = tree_with(&[ComponentKind::Text]);

        let after = add_node(
            &tree,
            &mut id_gen,
            &ids[0],
            ComponentKind::Button,
            MAIN_NODE,
            true,
            false,
        )
        .unwrap();
        after.apply(&mut tree).unwrap();

        let before = add_node(
            &tree,
            &mut id_gen,
            &ids[0],
            ComponentKind::Image,
            MAIN_NODE,
            false,
            false,
        )
        .unwrap();
        before.apply(&mut tree).unwrap();

        let kinds: Vec<ComponentKind> = tree
            .children(MAIN_NODE)
            .unwrap()
            .iter()
            .map(|id| tree.get(id).unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::Image,
                ComponentKind::Text,
                ComponentKind::Button
            ]
        );
    }

    #[test]
    fn test_add_node_without_current_appends() {
        let (tree, _, mut id_gen) = tree_with(&[ComponentKind::Text, ComponentKind::Text]);
        let mutation = add_node(
            &tree,
            &mut id_gen,
            "elsewhere",
            ComponentKind::Video,
            MAIN_NODE,
            false,
            false,
        )
        .unwrap();
        match mutation {
            Mutation::AddNodeTree { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_columns_renames_everything() {
        let mut tree = NodeTree::empty_document();
        let mut id_gen = IdGenerator::from_seed("d");
        let columns = NodeSubtree::columns(2, &tree, &mut id_gen);
        let original = columns.root_id.clone();
        tree.insert_subtree(columns, MAIN_NODE, 0).unwrap();

        let mutation = duplicate_node(&tree, &mut id_gen, &original).unwrap();
        let Mutation::AddNodeTree {
            tree: copy,
            parent_id,
            index,
        } = &mutation
        else {
            panic!("expected AddNodeTree");
        };
        assert_eq!(parent_id, MAIN_NODE);
        assert_eq!(*index, 1);
        assert_eq!(copy.len(), 3);
        assert!(copy.nodes.keys().all(|id| !tree.contains(id)));

        let root = copy.root().unwrap();
        assert_eq!(root.linked_nodes.len(), 2);
        for column in root.linked_nodes.values() {
            assert_eq!(copy.nodes[column].parent.as_deref(), Some(root.id.as_str()));
        }

        mutation.apply(&mut tree).unwrap();
        assert!(tree.check_integrity().is_ok());
        assert_eq!(tree.count_kind(ComponentKind::Resizer), 4);
    }

    #[test]
    fn test_duplicate_fails_on_dangling_child() {
        let mut tree = NodeTree::empty_document();
        let mut id_gen = IdGenerator::from_seed("x");
        let mut broken = Node::new("box", ComponentKind::Container).with_canvas(true);
        broken.nodes.push("ghost".to_string());
        tree.insert_subtree(NodeSubtree::single(broken), MAIN_NODE, 0)
            .unwrap();

        let result = duplicate_node(&tree, &mut id_gen, "box");
        assert!(matches!(
            result,
            Err(EditorError::Tree(TreeError::DanglingChild { .. }))
        ));
    }
}
