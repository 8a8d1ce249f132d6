use mailcraft_document::{Node, NodeTree, ROOT_NODE};

/// Visitor pattern for traversing a document tree immutably
///
/// The default implementations walk the whole tree depth first: ordered
/// children first, then linked slots. Override `visit_node` to act on
/// nodes and call `walk_node` to keep descending.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &NodeTree) {
        walk_tree(self, tree);
    }

    fn visit_node(&mut self, tree: &NodeTree, node: &Node, depth: usize) {
        walk_node(self, tree, node, depth);
    }

    /// Called for a child id that has no node in the tree
    fn visit_missing(&mut self, _parent: &Node, _child_id: &str) {}
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &NodeTree) {
    if let Some(root) = tree.get(ROOT_NODE) {
        visitor.visit_node(tree, root, 0);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, tree: &NodeTree, node: &Node, depth: usize) {
    for child_id in node.child_refs() {
        match tree.get(child_id) {
            Some(child) => visitor.visit_node(tree, child, depth + 1),
            None => visitor.visit_missing(node, child_id),
        }
    }
}

/// Indented `label (kind) #id` lines, one per node
#[derive(Default)]
pub struct Outline {
    lines: Vec<String>,
}

impl Outline {
    pub fn of(tree: &NodeTree) -> String {
        let mut outline = Self::default();
        outline.visit_tree(tree);
        outline.lines.join("\n")
    }
}

impl Visitor for Outline {
    fn visit_node(&mut self, tree: &NodeTree, node: &Node, depth: usize) {
        let hidden = if node.hidden { " [hidden]" } else { "" };
        self.lines.push(format!(
            "{}{} ({}) #{}{}",
            "  ".repeat(depth),
            node.label(),
            node.kind,
            node.id,
            hidden
        ));
        walk_node(self, tree, node, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::{IdGenerator, NodeSubtree, MAIN_NODE};

    #[derive(Default)]
    struct DepthCollector {
        depths: Vec<(String, usize)>,
    }

    impl Visitor for DepthCollector {
        fn visit_node(&mut self, tree: &NodeTree, node: &Node, depth: usize) {
            self.depths.push((node.id.clone(), depth));
            walk_node(self, tree, node, depth);
        }
    }

    #[test]
    fn test_walk_reaches_linked_slots() {
        let mut tree = NodeTree::empty_document();
        let mut ids = IdGenerator::from_seed("v");
        let columns = NodeSubtree::columns(2, &tree, &mut ids);
        tree.insert_subtree(columns, MAIN_NODE, 0).unwrap();

        let mut collector = DepthCollector::default();
        collector.visit_tree(&tree);

        assert_eq!(collector.depths.len(), tree.len());
        assert_eq!(collector.depths[0], (ROOT_NODE.to_string(), 0));
        assert_eq!(collector.depths[1], (MAIN_NODE.to_string(), 1));
        assert!(collector.depths[2..].iter().any(|(_, depth)| *depth == 3));
    }

    #[test]
    fn test_outline_of_empty_document() {
        let outline = Outline::of(&NodeTree::empty_document());
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("(BodyWrapper) #ROOT"));
        assert!(lines[1].starts_with("  Main (Container) #main"));
    }
}
