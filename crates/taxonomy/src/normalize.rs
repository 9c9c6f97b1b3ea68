//! Optional dish-name normalization applied before inference.
//!
//! Inference itself is case-sensitive and matches raw substrings. Callers
//! that want `"Chicken"` to trigger `chicken` opt in through
//! [`NormalizeConfig`]; both switches are off by default so the literal
//! behaviour is what you get unless configured otherwise.
//!
//! ```rust
//! use taxonomy::{normalize_name, NormalizeConfig};
//!
//! let cfg = NormalizeConfig {
//!     lowercase: true,
//!     collapse_whitespace: true,
//! };
//! assert_eq!(normalize_name("  Fried   RICE ", &cfg), "fried rice");
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Controls how dish names are rewritten before matching.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Apply locale-free Unicode lowercasing.
    #[serde(default)]
    pub lowercase: bool,
    /// Collapse whitespace runs to single spaces and trim the ends.
    #[serde(default)]
    pub collapse_whitespace: bool,
}

impl NormalizeConfig {
    /// Returns `true` when no rewriting is configured.
    pub fn is_identity(&self) -> bool {
        !self.lowercase && !self.collapse_whitespace
    }
}

/// Rewrites `name` according to `cfg`, borrowing when nothing changes.
pub fn normalize_name<'a>(name: &'a str, cfg: &NormalizeConfig) -> Cow<'a, str> {
    if cfg.is_identity() {
        return Cow::Borrowed(name);
    }

    let mut text = Cow::Borrowed(name);
    if cfg.collapse_whitespace {
        text = Cow::Owned(collapse_whitespace(&text));
    }
    if cfg.lowercase && text.chars().any(char::is_uppercase) {
        text = Cow::Owned(text.to_lowercase());
    }
    text
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}
