use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::index::TagIndex;

/// Tags inferred from a dish name.
///
/// Behaves as a set. Iteration follows discovery order: index order of the
/// triggering token, then chain order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AutoTagSet {
    tags: Vec<String>,
    members: HashSet<String>,
}

impl AutoTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag`, returning `false` if it was already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        if self.members.contains(tag) {
            return false;
        }
        self.members.insert(tag.to_string());
        self.tags.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.members.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags
    }
}

impl PartialEq for AutoTagSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for AutoTagSet {}

impl From<Vec<String>> for AutoTagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.iter().map(String::as_str).collect()
    }
}

impl From<AutoTagSet> for Vec<String> {
    fn from(set: AutoTagSet) -> Self {
        set.tags
    }
}

impl<'a> FromIterator<&'a str> for AutoTagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = AutoTagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Infers every tag triggered by `name`.
///
/// A token triggers when it occurs anywhere in `name` as a contiguous,
/// case-sensitive substring; its whole ancestor chain is then added. There is
/// no word-boundary check, so `"ricecake"` triggers `rice`.
pub fn infer(name: &str, index: &TagIndex) -> AutoTagSet {
    let mut tags = AutoTagSet::new();
    if name.is_empty() {
        return tags;
    }
    for (token, chain) in index.iter() {
        if name.contains(token) {
            for tag in chain {
                tags.insert(tag);
            }
        }
    }
    tags
}
