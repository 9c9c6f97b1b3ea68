use thiserror::Error;

/// Errors raised by the strict taxonomy builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("taxonomy node under `{parent}` has an empty name")]
    EmptyName { parent: String },
    #[error("taxonomy name `{0}` is reachable through more than one path")]
    DuplicateName(String),
}
