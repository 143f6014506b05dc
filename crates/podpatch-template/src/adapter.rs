//! Merging changes documents into typed pod templates.
//!
//! The typed template is turned into a generic tree, merged with the parsed
//! changes, and read back into the typed model:
//!
//! ```text
//! PodTemplateSpec ──serialize──▶ Node ──merge_documents──▶ Node ──deserialize──▶ PodTemplateSpec
//!                                          ▲
//!                        changes text ─────┘ (parsed first)
//! ```
//!
//! Fields the model does not know about are dropped on the way back.

use crate::error::{Result, TemplateError};
use crate::pod::PodTemplateSpec;
use podpatch_merge::{Mapping, Node, merge_documents, parse_mapping};
use serde_json::Value;

/// Merge a YAML or JSON changes document into a pod template.
///
/// `changes` is parsed before anything else happens; a parse failure returns
/// [`TemplateError::Parse`] and nothing is merged. The merge itself cannot
/// fail, but reading the result back into a [`PodTemplateSpec`] can, with
/// [`TemplateError::TypeAdaptation`].
pub fn merge_into_template_spec(
    template: &PodTemplateSpec,
    changes: &str,
) -> Result<PodTemplateSpec> {
    let changes = parse_mapping(changes)?;
    let source = template_to_mapping(template)?;

    tracing::debug!(change_keys = changes.len(), "Merging changes into pod template");
    let merged = merge_documents(source, &changes);

    mapping_to_template(merged)
}

/// Like [`merge_into_template_spec`], with the base template given as text.
///
/// The base is read into the typed model first, so its unknown fields are
/// dropped before the merge.
pub fn merge_template_text(base: &str, changes: &str) -> Result<PodTemplateSpec> {
    let template = parse_template(base)?;
    merge_into_template_spec(&template, changes)
}

/// Read a YAML or JSON document as a pod template.
pub fn parse_template(text: &str) -> Result<PodTemplateSpec> {
    let document = parse_mapping(text)?;
    mapping_to_template(document)
}

fn template_to_mapping(template: &PodTemplateSpec) -> Result<Mapping> {
    let value = serde_json::to_value(template).map_err(TemplateError::TypeAdaptation)?;
    let Node::Mapping(entries) = Node::from(value) else {
        return Ok(Mapping::new());
    };
    Ok(entries)
}

fn mapping_to_template(document: Mapping) -> Result<PodTemplateSpec> {
    let value = Value::from(Node::Mapping(document));
    serde_json::from_value(value).map_err(TemplateError::TypeAdaptation)
}
