//! Conversion between text, `serde_json::Value`, and [`Node`] trees.
//!
//! YAML is read through `serde_yaml` into a `serde_json::Value`, so JSON input
//! (a subset of YAML) goes through the same path and both formats yield
//! identical trees.

use crate::error::{ParseError, Result};
use crate::types::{Mapping, Node, Scalar};
use serde_json::Value;

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Node::Scalar(Scalar::Number(n)) => Value::Number(n),
            Node::Scalar(Scalar::String(s)) => Value::String(s),
            Node::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Parse a YAML or JSON document into a tree.
///
/// Blank input yields `Node::Null`.
pub fn parse_document(text: &str) -> Result<Node> {
    if text.trim().is_empty() {
        return Ok(Node::Null);
    }
    let value: Value = serde_yaml::from_str(text)?;
    Ok(Node::from(value))
}

/// Parse a document whose root must be a mapping.
///
/// A blank or `null` document is treated as an empty mapping.
pub fn parse_mapping(text: &str) -> Result<Mapping> {
    match parse_document(text)? {
        Node::Mapping(entries) => Ok(entries),
        Node::Null => Ok(Mapping::new()),
        other => Err(ParseError::NotAMapping {
            found: other.kind_name(),
        }),
    }
}
