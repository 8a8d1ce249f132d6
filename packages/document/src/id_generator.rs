use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::tree::NodeTree;
use crate::NodeId;

const RANDOM_ID_LEN: usize = 10;

/// Allocates node ids.
///
/// Random ids match what the browser editor produces. Seeded generators
/// emit `{seed}-{n}` and exist so tests can predict ids.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    seed: Option<String>,
    count: u32,
}

impl IdGenerator {
    pub fn random() -> Self {
        Self {
            seed: None,
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: Some(seed.into()),
            count: 0,
        }
    }

    /// Generate the next id
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        match &self.seed {
            Some(seed) => format!("{}-{}", seed, self.count),
            None => rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(RANDOM_ID_LEN)
                .map(char::from)
                .collect(),
        }
    }

    /// Generate an id that is not yet used in `tree`
    pub fn fresh_id(&mut self, tree: &NodeTree) -> NodeId {
        loop {
            let id = self.new_id();
            if !tree.contains(&id) {
                return id;
            }
        }
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.count
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("node");

        assert_eq!(gen.new_id(), "node-1");
        assert_eq!(gen.new_id(), "node-2");
        assert_eq!(gen.issued(), 2);
    }

    #[test]
    fn test_random_ids_are_alphanumeric() {
        let mut gen = IdGenerator::random();
        let id = gen.new_id();

        assert_eq!(id.len(), RANDOM_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, gen.new_id());
    }

    #[test]
    fn test_fresh_id_skips_existing() {
        let tree = NodeTree::empty_document();
        // "main" is taken by the default frame
        let mut gen = IdGenerator::from_seed("main");
        let id = gen.fresh_id(&tree);
        assert_eq!(id, "main-1");
        assert!(!tree.contains(&id));
    }
}
