//! Core type definitions for document trees.

use indexmap::IndexMap;
use serde_json::Number;

/// A mapping node's entries, keyed by field name.
pub type Mapping = IndexMap<String, Node>;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

/// A node of a parsed YAML/JSON document.
///
/// This mirrors the shapes a schema-less YAML or JSON parser produces.
/// `Null` doubles as the deletion marker in merge results.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Key/value pairs. Iteration follows insertion order, but merge
    /// semantics never depend on it.
    Mapping(Mapping),

    /// Ordered list of nodes.
    Sequence(Vec<Node>),

    /// String, number, or boolean.
    Scalar(Scalar),

    /// Explicit absence.
    #[default]
    Null,
}

impl Node {
    /// Create a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Get as mapping entries if this is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get as sequence items if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get the string value if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a field of a mapping node. Non-mappings have no fields.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|entries| entries.get(key))
    }

    /// Short name of the node's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Scalar(Scalar::Number(_)) => "number",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Null => "null",
        }
    }
}

impl From<Mapping> for Node {
    fn from(entries: Mapping) -> Self {
        Node::Mapping(entries)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(Scalar::Number(value.into()))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Number(value.into()))
    }
}
