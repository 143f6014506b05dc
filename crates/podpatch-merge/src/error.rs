//! Error types for reading documents into trees.

use thiserror::Error;

/// Errors that can occur while parsing a document into a [`Node`](crate::Node) tree.
///
/// Merging itself never fails; these are reported before a merge is attempted.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not valid YAML (JSON input is parsed as YAML too).
    #[error("failed to parse YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but its root is not a mapping.
    #[error("expected a mapping at the document root, found {found}")]
    NotAMapping {
        /// Shape of the root node that was found instead
        found: &'static str,
    },
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
