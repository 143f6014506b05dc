//! Error types for podpatch-template

use podpatch_merge::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template must be specified")]
    MissingTemplate,

    /// A template or changes document could not be read. Nothing was merged.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The merged document does not fit the typed pod template.
    #[error("document does not match the pod template schema: {0}")]
    TypeAdaptation(#[source] serde_json::Error),

    #[error("invalid pod patch configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
