//! Token → ancestor chain index.
//!
//! Each key is the name of a taxonomy node. Its chain starts with the token
//! itself, followed by every strict ancestor from nearest to root-most. The
//! synthetic root never appears in a chain.
//!
//! Key order is the depth-first order in which a name was first seen, so
//! iteration (and therefore [`infer`](crate::infer) output) is deterministic.

use std::sync::OnceLock;

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::TaxonomyError;
use crate::food::food_taxonomy;
use crate::node::TaxonomyNode;

/// Immutable mapping from token to its ordered ancestor chain.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: FxHashMap<String, usize>,
}

impl TagIndex {
    /// Builds an index from every node below `root`.
    ///
    /// A name reachable through several paths keeps its first position and
    /// the chain of the last path visited.
    pub fn from_root(root: &TaxonomyNode) -> Self {
        let index = collect_chains(root);
        debug!(
            root = %root.name,
            tokens = index.len(),
            "tag_index_built"
        );
        index
    }

    /// Builds an index, rejecting empty or repeated names.
    pub fn try_from_root(root: &TaxonomyNode) -> Result<Self, TaxonomyError> {
        let mut seen = FxHashSet::default();
        check_names(root, &mut seen)?;
        Ok(Self::from_root(root))
    }

    /// Process-wide index over the built-in food taxonomy.
    ///
    /// Built on first use and shared read-only afterwards.
    pub fn food() -> &'static TagIndex {
        static FOOD_INDEX: OnceLock<TagIndex> = OnceLock::new();
        FOOD_INDEX.get_or_init(|| TagIndex::from_root(&food_taxonomy()))
    }

    /// Ancestor chain for `token`, if it is a taxonomy name.
    pub fn chain(&self, token: &str) -> Option<&[String]> {
        self.positions
            .get(token)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Returns `true` if `token` is a taxonomy name.
    pub fn contains_token(&self, token: &str) -> bool {
        self.positions.contains_key(token)
    }

    /// Iterates over all tokens in index order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    /// Iterates over `(token, chain)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(token, chain)| (token.as_str(), chain.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, token: String, chain: Vec<String>) {
        match self.positions.get(&token) {
            Some(&pos) => self.entries[pos].1 = chain,
            None => {
                self.positions.insert(token.clone(), self.entries.len());
                self.entries.push((token, chain));
            }
        }
    }
}

/// Recursively collects chains for every descendant of `tree`.
///
/// Each child records `[child]`, then every key found in the child's subtree
/// has the child's name appended to its chain.
fn collect_chains(tree: &TaxonomyNode) -> TagIndex {
    let mut index = TagIndex::default();
    for child in &tree.children {
        index.insert(child.name.clone(), vec![child.name.clone()]);
        let subtree = collect_chains(child);
        for (token, mut chain) in subtree.entries {
            chain.push(child.name.clone());
            index.insert(token, chain);
        }
    }
    index
}

fn check_names(tree: &TaxonomyNode, seen: &mut FxHashSet<String>) -> Result<(), TaxonomyError> {
    for child in &tree.children {
        if child.name.is_empty() {
            return Err(TaxonomyError::EmptyName {
                parent: tree.name.clone(),
            });
        }
        if !seen.insert(child.name.clone()) {
            return Err(TaxonomyError::DuplicateName(child.name.clone()));
        }
        check_names(child, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{leaf, leaves, node};

    fn chain_of(index: &TagIndex, token: &str) -> Vec<String> {
        index
            .chain(token)
            .unwrap_or_else(|| panic!("missing token {token}"))
            .to_vec()
    }

    #[test]
    fn chains_run_nearest_ancestor_first() {
        let index = TagIndex::food();
        assert_eq!(chain_of(index, "chicken"), ["chicken", "meat", "protein"]);
        assert_eq!(chain_of(index, "meat"), ["meat", "protein"]);
        assert_eq!(chain_of(index, "tofu"), ["tofu", "protein"]);
        assert_eq!(chain_of(index, "rice"), ["rice", "starch"]);
        assert_eq!(chain_of(index, "vegan"), ["vegan"]);
    }

    #[test]
    fn root_never_appears() {
        let index = TagIndex::food();
        assert!(!index.contains_token("food"));
        assert!(index.iter().all(|(_, chain)| !chain.iter().any(|t| t == "food")));
    }

    #[test]
    fn repeated_name_keeps_last_chain_first_position() {
        let index = TagIndex::food();
        assert_eq!(chain_of(index, "egg"), ["egg", "dairy"]);

        let egg_pos = index.tokens().position(|t| t == "egg").expect("egg");
        let milk_pos = index.tokens().position(|t| t == "milk").expect("milk");
        assert!(egg_pos < milk_pos);
    }

    #[test]
    fn every_node_name_is_a_key_once() {
        let index = TagIndex::food();
        let mut tokens: Vec<&str> = index.tokens().collect();
        let total = tokens.len();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), total);
        // 4 branches, 1 meat node, 14 meats, 4 protein extras, 7 vegan,
        // 6 dairy, 19 starches, less 2 repeats (protein, egg).
        assert_eq!(total, 4 + 1 + 14 + 4 + 7 + 6 + 19 - 2);
    }

    #[test]
    fn strict_builder_rejects_repeats() {
        let tree = node("root", vec![node("a", leaves(&["x"])), node("b", leaves(&["x"]))]);
        assert_eq!(
            TagIndex::try_from_root(&tree).unwrap_err(),
            TaxonomyError::DuplicateName("x".into())
        );
        assert!(TagIndex::try_from_root(&food_taxonomy()).is_err());
    }

    #[test]
    fn strict_builder_rejects_empty_names() {
        let tree = node("root", vec![node("a", vec![leaf("")])]);
        assert_eq!(
            TagIndex::try_from_root(&tree).unwrap_err(),
            TaxonomyError::EmptyName { parent: "a".into() }
        );
    }

    #[test]
    fn strict_builder_accepts_unique_tree() {
        let tree = node("root", vec![node("a", leaves(&["b", "c"])), leaf("d")]);
        let index = TagIndex::try_from_root(&tree).expect("unique names");
        assert_eq!(index.len(), 4);
        assert_eq!(chain_of(&index, "c"), ["c", "a"]);
    }

    #[test]
    fn empty_tree_builds_empty_index() {
        let index = TagIndex::from_root(&leaf("root"));
        assert!(index.is_empty());
    }
}
