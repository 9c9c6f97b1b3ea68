//! Food taxonomy and dish tag inference.
//!
//! A fixed tree of food categories is flattened once into a [`TagIndex`]
//! that maps every category name to its ancestor chain. [`infer`] then scans
//! a dish name for those names and returns every tag they imply.
//!
//! ## What we do
//!
//! - Build the vocabulary from a nested literal ([`food_taxonomy`])
//! - Flatten it into a token → chain index, once per process ([`TagIndex::food`])
//! - Infer tags by plain substring containment ([`infer`])
//! - Optionally normalize names before matching ([`normalize_name`])
//!
//! ## Pure function guarantee
//!
//! No I/O and no clock. The same name against the same index gives the same
//! tags in the same order, on any machine.
//!
//! ## Known limitation
//!
//! Matching is case-sensitive and not word-boundary aware: `"ricecake"`
//! triggers `rice`, `"eggplant"` triggers `egg`.
//!
//! ```rust
//! use taxonomy::{infer, TagIndex};
//!
//! let tags = infer("grilled chicken with rice", TagIndex::food());
//! for tag in ["chicken", "meat", "protein", "rice", "starch"] {
//!     assert!(tags.contains(tag));
//! }
//! ```

mod error;
mod food;
mod index;
mod infer;
mod node;
mod normalize;

pub use crate::error::TaxonomyError;
pub use crate::food::{food_taxonomy, FOOD_ROOT};
pub use crate::index::TagIndex;
pub use crate::infer::{infer, AutoTagSet};
pub use crate::node::{leaf, leaves, node, TaxonomyNode};
pub use crate::normalize::{normalize_name, NormalizeConfig};
