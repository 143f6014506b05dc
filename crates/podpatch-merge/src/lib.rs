//! Identity-aware merging of YAML/JSON document trees.
//!
//! This crate lets a partial, hand-written override document ("changes")
//! patch, replace, or delete fields and list elements of a larger generated
//! document ("source").
//!
//! # Key Features
//!
//! - **Recursive merge**: mappings merge field by field, scalars override
//! - **Identity-aware lists**: sequences of mappings are reconciled by their
//!   `name`, `id`, or `key` field instead of by position
//! - **Deletion conventions**: the string `"null"` nulls a key, and an element
//!   patch with `value: null` removes the matched list element
//! - **Permissive**: merging never fails; every shape mismatch resolves to a
//!   result
//!
//! # Example
//!
//! ```rust
//! use podpatch_merge::{merge_documents, parse_mapping, Node};
//!
//! let source = parse_mapping("containers: [{name: app, image: app-v1}]").unwrap();
//! let changes = parse_mapping("containers: [{name: app, image: app-v2}]").unwrap();
//!
//! let merged = merge_documents(source, &changes);
//! let image = merged["containers"].as_sequence().unwrap()[0].get("image");
//! assert_eq!(image, Some(&Node::from("app-v2")));
//! ```

mod convert;
mod error;
mod merge;
mod types;

pub use types::{Mapping, Node, Scalar};

pub use error::{ParseError, Result};

pub use convert::{parse_document, parse_mapping};

pub use merge::{
    DEFAULT_IDENTITY_FIELD,
    ELEMENT_DELETE_FIELD,
    NULL_SENTINEL,
    find_in_sequence,
    identity_field,
    identity_text,
    merge_documents,
    merge_sequences,
    merge_value,
};

/// Parse two documents and merge `changes` into `source`.
///
/// Both documents are parsed before anything is merged, so a malformed
/// changes document leaves no partial result.
pub fn merge_text(source: &str, changes: &str) -> Result<Mapping> {
    let source = parse_mapping(source)?;
    let changes = parse_mapping(changes)?;
    Ok(merge_documents(source, &changes))
}
