//! The built-in food vocabulary.
//!
//! Some names appear twice on purpose: `protein` is listed inside its own
//! branch so that the word itself triggers the tag, and `egg` sits under both
//! `protein` and `dairy`. The lenient index builder keeps the last chain it
//! visits, so `egg` resolves to `[egg, dairy]`.

use crate::node::{leaves, node, TaxonomyNode};

/// Name of the synthetic root. Never emitted as a tag.
pub const FOOD_ROOT: &str = "food";

fn meats() -> Vec<TaxonomyNode> {
    leaves(&[
        "chicken", "pork", "bacon", "lamb", "ribs", "beef", "turkey", "steak", "fish", "tilapia",
        "salmon", "flounder", "shrimp", "squid",
    ])
}

fn vegan_protein() -> Vec<TaxonomyNode> {
    leaves(&[
        "tofu", "bean", "chickpea", "lentil", "seitan", "tempeh", "edamame",
    ])
}

fn protein() -> Vec<TaxonomyNode> {
    let mut children = vec![node("meat", meats())];
    children.extend(leaves(&["protein", "egg", "sausage", "meatball"]));
    children.extend(vegan_protein());
    children
}

fn dairy() -> Vec<TaxonomyNode> {
    leaves(&["milk", "egg", "cheese", "butter", "cream", "yogurt"])
}

fn starch() -> Vec<TaxonomyNode> {
    leaves(&[
        "rice", "pasta", "mac", "macaroni", "spaghetti", "gnocchi", "penne", "ziti", "ravioli",
        "risotto", "couscous", "rotini", "lasagna", "bread", "roll", "potato", "quinoa", "noodle",
        "ramen",
    ])
}

/// Returns the fixed food taxonomy rooted at [`FOOD_ROOT`].
pub fn food_taxonomy() -> TaxonomyNode {
    node(
        FOOD_ROOT,
        vec![
            node("protein", protein()),
            node("dairy", dairy()),
            node("vegan", Vec::new()),
            node("starch", starch()),
        ],
    )
}
