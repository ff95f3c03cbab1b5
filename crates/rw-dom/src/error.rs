//! Error types for document querying and mutation.

/// Error raised while querying or mutating a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// Selector syntax the selector engine does not accept.
    #[error("invalid selector `{0}`")]
    Selector(String),

    /// Insertion would make a node its own ancestor.
    #[error("node cannot be inserted into its own subtree")]
    Hierarchy,
}
