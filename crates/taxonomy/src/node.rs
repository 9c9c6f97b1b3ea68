//! Tree nodes for the food vocabulary.

use serde::{Deserialize, Serialize};

/// A named category with zero or more named child categories.
///
/// Trees are built from literals with [`node`] and [`leaf`] and are never
/// mutated afterwards. Owned children make cycles unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyNode {
    /// Category name. Doubles as the token matched against dish names.
    pub name: String,
    /// Child categories in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNode>,
}

impl TaxonomyNode {
    /// Returns `true` when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes below this one, not counting itself.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Builds an internal node.
pub fn node(name: impl Into<String>, children: Vec<TaxonomyNode>) -> TaxonomyNode {
    TaxonomyNode {
        name: name.into(),
        children,
    }
}

/// Builds a node without children.
pub fn leaf(name: impl Into<String>) -> TaxonomyNode {
    node(name, Vec::new())
}

/// Builds a list of leaves from plain names.
pub fn leaves(names: &[&str]) -> Vec<TaxonomyNode> {
    names.iter().map(|name| leaf(*name)).collect()
}
