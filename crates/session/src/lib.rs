//! # Tag editing sessions (`session`)
//!
//! ## Purpose
//!
//! `session` sits on top of `taxonomy` and reconciles automatically inferred
//! dish tags with what the person editing the dish actually wants. One
//! [`TagSession`] lives for one editing interaction, from open to save or
//! cancel.
//!
//! ## Rules
//!
//! - A name edit re-runs inference and adds every inferred tag that is not
//!   excluded. It never removes anything.
//! - Removing a tag that the current name infers excludes it for the rest of
//!   the session, so typing more of the name does not bring it back.
//! - Adding a tag by hand always shows it and lifts any exclusion on it.
//! - When an existing dish is loaded, every tag its name infers but that is
//!   missing from the saved tags counts as excluded.
//! - Save and cancel are terminal. Any later call returns a [`SessionError`].
//!
//! ## Core Types
//!
//! - [`TagSession`]: the state machine.
//! - [`TagList`]: ordered, duplicate-free displayed tags.
//! - [`ExistingDish`] / [`SavedDish`]: what goes in and what comes out.
//! - [`SessionConfig`]: name normalization applied before inference.
//!
//! ## Example Usage
//!
//! ```
//! use session::{SessionConfig, TagSession};
//! use taxonomy::TagIndex;
//!
//! let mut session = TagSession::start(TagIndex::food(), SessionConfig::default(), None);
//! session.on_name_changed("grilled chicken with rice").unwrap();
//! session.on_tag_removed("protein").unwrap();
//! let shown = session
//!     .on_name_changed("grilled chicken and beef with rice")
//!     .unwrap();
//! assert!(shown.contains("beef"));
//! assert!(!shown.contains("protein"));
//!
//! let saved = session.save().unwrap();
//! assert_eq!(saved.name, "grilled chicken and beef with rice");
//! ```
//!
//! ## Observability
//!
//! Transitions log through `tracing`. Install a [`SessionMetrics`]
//! implementation via [`set_session_metrics`] to record per-transition
//! latency; this is typically done once during startup.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::TagSession;
pub use crate::metrics::{set_session_metrics, SessionMetrics, Transition};
pub use crate::types::{
    CloseReason, ExistingDish, SavedDish, SessionConfig, SessionError, SessionState, TagList,
};
