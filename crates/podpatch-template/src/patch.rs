//! Pod template patch configuration.

use crate::adapter::{merge_into_template_spec, parse_template};
use crate::error::{Result, TemplateError};
use crate::pod::PodTemplateSpec;
use podpatch_merge::{Node, parse_document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user-supplied patch for a pod template.
///
/// `template` holds a partial pod template as YAML or JSON text, merged over
/// the target template by [`apply`](Self::apply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodTemplatePatch {
    pub template: String,
}

impl PodTemplatePatch {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load a patch configuration from a YAML or JSON document, e.g.
    /// `template: "spec: {...}"`.
    pub fn from_config(text: &str) -> Result<Self> {
        let value = match parse_document(text)? {
            Node::Null => Value::Object(Default::default()),
            node => Value::from(node),
        };
        serde_json::from_value(value).map_err(TemplateError::InvalidConfig)
    }

    /// Check that a template is set and reads as a pod template.
    ///
    /// Returns the parsed template on success.
    pub fn validate(&self) -> Result<PodTemplateSpec> {
        self.ensure_template()?;
        parse_template(&self.template)
    }

    /// Merge the configured template into `target`.
    pub fn apply(&self, target: &PodTemplateSpec) -> Result<PodTemplateSpec> {
        self.ensure_template()?;
        tracing::debug!(containers = target.spec.containers.len(), "Applying pod template patch");
        merge_into_template_spec(target, &self.template)
    }

    fn ensure_template(&self) -> Result<()> {
        if self.template.trim().is_empty() {
            return Err(TemplateError::MissingTemplate);
        }
        Ok(())
    }
}
